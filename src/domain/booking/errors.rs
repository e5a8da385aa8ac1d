//! Booking-specific error types.

use crate::domain::foundation::{ErrorCode, ValidationError};
use thiserror::Error;

/// Invariant violations raised by the booking form.
///
/// These never crash a conversation: the application edge turns them into a
/// short warning on the callback acknowledgement channel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingError {
    #[error("Room {} is still being edited", .open + 1)]
    RoomAlreadyOpen { open: usize },

    #[error("Room {} is not open for editing", .room + 1)]
    RoomNotOpen { room: usize },

    #[error("Room {} does not exist ({total} rooms)", .room + 1)]
    RoomOutOfRange { room: usize, total: usize },

    #[error("A booking holds at most {max} rooms")]
    RoomLimitReached { max: usize },

    #[error("Room {} already has {max} children", .room + 1)]
    ChildLimitReached { room: usize, max: usize },

    #[error("At least two rooms are needed to delete one")]
    NothingToDelete,

    #[error("Missing criterion: {0}")]
    MissingCriterion(&'static str),

    #[error("The booking form is already finished")]
    AlreadyFinished,

    #[error("The booking form is not finished yet")]
    NotFinished,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl BookingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::RoomAlreadyOpen { .. } => ErrorCode::RoomAlreadyOpen,
            BookingError::RoomNotOpen { .. } => ErrorCode::RoomNotOpen,
            BookingError::RoomOutOfRange { .. } => ErrorCode::RoomOutOfRange,
            BookingError::RoomLimitReached { .. }
            | BookingError::ChildLimitReached { .. }
            | BookingError::NothingToDelete => ErrorCode::LimitReached,
            BookingError::MissingCriterion(_) => ErrorCode::MissingCriterion,
            BookingError::AlreadyFinished | BookingError::NotFinished => {
                ErrorCode::InvalidStateTransition
            }
            BookingError::Invalid(_) => ErrorCode::ValidationFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_numbers_are_shown_one_based() {
        let err = BookingError::RoomAlreadyOpen { open: 0 };
        assert_eq!(err.to_string(), "Room 1 is still being edited");
    }

    #[test]
    fn limits_share_one_code() {
        assert_eq!(BookingError::RoomLimitReached { max: 7 }.code(), ErrorCode::LimitReached);
        assert_eq!(
            BookingError::ChildLimitReached { room: 0, max: 6 }.code(),
            ErrorCode::LimitReached
        );
        assert_eq!(BookingError::NothingToDelete.code(), ErrorCode::LimitReached);
    }

    #[test]
    fn invalid_values_keep_the_validation_code() {
        let err: BookingError = ValidationError::out_of_range("adults", 1, 14, 15).into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
