//! Booking wizard handlers.
//!
//! One module per conversation step. Each step is a free function over a
//! [`Turn`], the per-event context that owns the user's session while the
//! event is processed. [`BookingDispatcher`] loads the session, routes the
//! event and persists the result.

mod commands;
mod criteria;
mod destination;
mod dispatcher;
mod errors;
mod finish;
mod rooms;
mod search;
mod session_locks;
pub mod texts;
mod turn;

pub use dispatcher::BookingDispatcher;
pub use errors::DispatchError;
pub use search::{SearchOrchestrator, SearchOutcome};
pub use session_locks::SessionLocks;
pub use turn::Turn;
