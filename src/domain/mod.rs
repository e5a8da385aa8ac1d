//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `booking` - Booking form state machine: stages, rooms, guest cycle, summaries
//! - `controls` - Inline keyboards, callback payload grammar, date pickers
//! - `search` - Hotel offers, result ranking and history records

pub mod booking;
pub mod controls;
pub mod foundation;
pub mod search;
