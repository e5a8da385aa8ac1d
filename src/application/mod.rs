//! Application layer - event handling for the booking wizard.
//!
//! This layer turns inbound chat events into domain operations on the
//! user's booking session and coordinates the ports that render, persist
//! and search.

pub mod handlers;

pub use handlers::{BookingDispatcher, DispatchError, SearchOrchestrator, SearchOutcome};
