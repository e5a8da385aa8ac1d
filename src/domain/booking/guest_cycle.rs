//! Guest cycle - which room (and which child slot in it) is being edited.
//!
//! Per room the lifecycle is:
//!
//! ```text
//! closed ──open──▶ openAdults ──adults──▶ openChildren(1) ──child──▶ openChildren(2) …
//!    ▲                                          │                          │
//!    └──────────────── no more children / sixth child ─────────────────────┘
//! ```
//!
//! Only one room may be outside `closed` at a time. The cycle stores at most
//! one open room, so a second open room cannot even be represented.

use serde::{Deserialize, Serialize};

use super::errors::BookingError;
use super::room_registry::MAX_CHILDREN;
use crate::domain::foundation::StateMachine;

/// Edit state of a single room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RoomEditState {
    #[default]
    Closed,
    OpenAdults,
    /// `slot` is the 1-based number of the child whose age is asked next.
    OpenChildren { slot: u8 },
}

impl RoomEditState {
    pub fn is_closed(&self) -> bool {
        matches!(self, RoomEditState::Closed)
    }
}

impl StateMachine for RoomEditState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RoomEditState::*;
        match (self, target) {
            (Closed, OpenAdults) => true,
            (OpenAdults, OpenChildren { slot: 1 }) => true,
            (OpenChildren { slot }, OpenChildren { slot: next }) => {
                *next == slot + 1 && usize::from(*slot) < MAX_CHILDREN
            }
            (OpenChildren { .. }, Closed) => true,
            _ => false,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RoomEditState::*;
        match self {
            Closed => vec![OpenAdults],
            OpenAdults => vec![OpenChildren { slot: 1 }],
            OpenChildren { slot } if usize::from(*slot) < MAX_CHILDREN => {
                vec![OpenChildren { slot: slot + 1 }, Closed]
            }
            OpenChildren { .. } => vec![Closed],
        }
    }
}

/// The single room currently being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRoom {
    pub room: usize,
    pub state: RoomEditState,
}

/// Room edit sub-state machine of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCycle {
    open: Option<OpenRoom>,
}

impl GuestCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `room`. Every room except the open one is closed.
    pub fn state_of(&self, room: usize) -> RoomEditState {
        match self.open {
            Some(open) if open.room == room => open.state,
            _ => RoomEditState::Closed,
        }
    }

    /// Index of the room being edited, if any.
    pub fn open_room(&self) -> Option<usize> {
        self.open.map(|o| o.room)
    }

    /// True when every room is closed.
    pub fn is_idle(&self) -> bool {
        self.open.is_none()
    }

    /// `closed → openAdults` for `room`.
    ///
    /// # Errors
    ///
    /// `RoomAlreadyOpen` if any room (including `room` itself) is open.
    pub fn open(&mut self, room: usize) -> Result<(), BookingError> {
        if let Some(open) = self.open {
            return Err(BookingError::RoomAlreadyOpen { open: open.room });
        }
        let state = RoomEditState::Closed.transition_to(RoomEditState::OpenAdults)?;
        self.open = Some(OpenRoom { room, state });
        Ok(())
    }

    /// `openAdults → openChildren(1)` once the adult count is known.
    pub fn adults_supplied(&mut self, room: usize) -> Result<(), BookingError> {
        let current = self.expect_open(room)?;
        if current != RoomEditState::OpenAdults {
            return Err(BookingError::RoomNotOpen { room });
        }
        self.move_to(room, RoomEditState::OpenChildren { slot: 1 })
    }

    /// Checks that `room` is collecting children and returns the open slot.
    pub fn child_slot(&self, room: usize) -> Result<u8, BookingError> {
        match self.expect_open(room)? {
            RoomEditState::OpenChildren { slot } => Ok(slot),
            _ => Err(BookingError::RoomNotOpen { room }),
        }
    }

    /// Records a child in the open slot.
    ///
    /// Moves to the next slot, or closes the room once it holds
    /// `children_now == MAX_CHILDREN`. Returns the resulting state.
    pub fn child_added(
        &mut self,
        room: usize,
        children_now: usize,
    ) -> Result<RoomEditState, BookingError> {
        let slot = self.child_slot(room)?;
        let next = if children_now >= MAX_CHILDREN {
            RoomEditState::Closed
        } else {
            RoomEditState::OpenChildren { slot: slot + 1 }
        };
        self.move_to(room, next)?;
        Ok(next)
    }

    /// `openChildren(k) → closed`. The only way back to closed.
    pub fn close(&mut self, room: usize) -> Result<(), BookingError> {
        self.child_slot(room)?;
        self.move_to(room, RoomEditState::Closed)
    }

    fn expect_open(&self, room: usize) -> Result<RoomEditState, BookingError> {
        match self.open {
            Some(open) if open.room == room => Ok(open.state),
            _ => Err(BookingError::RoomNotOpen { room }),
        }
    }

    fn move_to(&mut self, room: usize, target: RoomEditState) -> Result<(), BookingError> {
        let current = self.expect_open(room)?;
        let state = current.transition_to(target)?;
        self.open = if state.is_closed() {
            None
        } else {
            Some(OpenRoom { room, state })
        };
        Ok(())
    }
}
