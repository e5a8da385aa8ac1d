//! Hotel Wizard - a chat bot that books hotel searches step by step.
//!
//! A user picks a search variant, a destination, a hotel count, dates and
//! room occupancy through inline buttons. The wizard keeps one editable
//! summary per conversation, validates the form and runs the hotel search.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
