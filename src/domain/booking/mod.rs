//! Booking module - the conversation state machine of the booking form.
//!
//! # Components
//!
//! - `Stage` - monotonic stage guard
//! - `DestinationLock` - queues stray input during destination disambiguation
//! - `GuestCycle` - at most one room (and one child slot) open at a time
//! - `RoomRegistry` - contiguously indexed room drafts
//! - `SummaryMemory` - what the two live summary messages show
//! - `validate` - pre-submission checks
//! - `BookingSession` - the aggregate tying them together

mod command;
mod criteria;
mod destination_lock;
mod errors;
mod guest_cycle;
mod input;
mod room_registry;
mod session;
mod stage;
mod summary;
mod validator;

pub use command::{is_greeting, SearchCommand, TopLevelCommand};
pub use criteria::{PhotoRequest, PriceRange, RoomOccupancy, SearchCriteria};
pub use destination_lock::DestinationLock;
pub use errors::BookingError;
pub use guest_cycle::{GuestCycle, OpenRoom, RoomEditState};
pub use input::{parse_distance, parse_numbers, parse_price_range};
pub use room_registry::{RoomDraft, RoomRegistry, MAX_ADULTS, MAX_CHILDREN, MAX_CHILD_AGE, MAX_ROOMS};
pub use session::{BookingSession, ChildAdded, LiveSurfaces, RetiredSession, TextPrompt};
pub use stage::Stage;
pub use summary::{
    ControlRef, RoomSummary, RoomsBranch, ScalarField, SummaryMemory, SummaryNode, SummarySlot,
};
pub use validator::{validate, Finding, ValidationReport, MAX_OCCUPANCY};
