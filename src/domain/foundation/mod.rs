//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait and error types
//! that form the vocabulary of the booking domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{CallbackId, ChatId, HistoryRecordId, MessageId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
