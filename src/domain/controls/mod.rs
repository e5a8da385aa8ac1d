//! Interactive controls: inline keyboards, callback payloads, date pickers
//! and the keyboard factories used by every prompt.

mod calendar;
mod callback;
mod keyboard;
pub mod menus;

pub use calendar::{Calendar, CalendarOutcome, CHECK_IN_HORIZON_DAYS, CHECK_OUT_HORIZON_DAYS};
pub use callback::{CalendarKind, CalendarStep, CallbackAction, SummaryField};
pub use keyboard::{InlineButton, InlineKeyboard, CHOICE_MARK};
pub use menus::ChildrenExit;
