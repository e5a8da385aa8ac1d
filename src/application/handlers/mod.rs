//! Application handlers.
//!
//! Event handlers that drive the booking conversation through the ports.

pub mod booking;

pub use booking::{BookingDispatcher, DispatchError, SearchOrchestrator, SearchOutcome};
