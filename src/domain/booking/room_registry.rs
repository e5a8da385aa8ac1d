//! Room registry - ordered, contiguously indexed room drafts.

use serde::{Deserialize, Serialize};

use super::errors::BookingError;
use crate::domain::foundation::ValidationError;

/// Rooms a single booking may hold.
pub const MAX_ROOMS: usize = 7;

/// Children a single room may hold.
pub const MAX_CHILDREN: usize = 6;

/// Adults per room accepted by the adults keyboard.
pub const MAX_ADULTS: u8 = 14;

/// Oldest age that still counts as a child.
pub const MAX_CHILD_AGE: u8 = 17;

/// One room's guests, committed or mid-edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDraft {
    adults: Option<u8>,
    children: Vec<u8>,
}

impl RoomDraft {
    /// A freshly added room with nothing chosen yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A complete room. Validates the adult count and every age.
    pub fn new(adults: u8, children: Vec<u8>) -> Result<Self, BookingError> {
        validate_adults(adults)?;
        if children.len() > MAX_CHILDREN {
            return Err(ValidationError::out_of_range(
                "children",
                0,
                MAX_CHILDREN as i64,
                children.len() as i64,
            )
            .into());
        }
        for age in &children {
            validate_age(*age)?;
        }
        Ok(Self {
            adults: Some(adults),
            children,
        })
    }

    pub fn adults(&self) -> Option<u8> {
        self.adults
    }

    pub fn children(&self) -> &[u8] {
        &self.children
    }

    /// Adults plus children.
    pub fn occupancy(&self) -> usize {
        usize::from(self.adults.unwrap_or(0)) + self.children.len()
    }
}

fn validate_adults(adults: u8) -> Result<(), BookingError> {
    if adults == 0 || adults > MAX_ADULTS {
        return Err(
            ValidationError::out_of_range("adults", 1, MAX_ADULTS.into(), adults.into()).into(),
        );
    }
    Ok(())
}

fn validate_age(age: u8) -> Result<(), BookingError> {
    if age > MAX_CHILD_AGE {
        return Err(
            ValidationError::out_of_range("child_age", 0, MAX_CHILD_AGE.into(), age.into()).into(),
        );
    }
    Ok(())
}

/// Rooms of a booking, indexed `0..len()` with no gaps.
///
/// Each draft owns its children list, so a room and its children can never
/// drift apart when indices are renumbered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomRegistry {
    rooms: Vec<RoomDraft>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rooms (`totalRooms`).
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// True while another room may still be appended.
    pub fn can_append(&self) -> bool {
        self.rooms.len() < MAX_ROOMS
    }

    pub fn get(&self, index: usize) -> Option<&RoomDraft> {
        self.rooms.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomDraft> {
        self.rooms.iter()
    }

    /// Adds `draft` at index `len()` and returns that index.
    ///
    /// # Errors
    ///
    /// `RoomLimitReached` once [`MAX_ROOMS`] rooms exist.
    pub fn append(&mut self, draft: RoomDraft) -> Result<usize, BookingError> {
        if !self.can_append() {
            return Err(BookingError::RoomLimitReached { max: MAX_ROOMS });
        }
        self.rooms.push(draft);
        Ok(self.rooms.len() - 1)
    }

    /// Replaces the room at `index` in place.
    pub fn edit(&mut self, index: usize, draft: RoomDraft) -> Result<(), BookingError> {
        *self.room_mut(index)? = draft;
        Ok(())
    }

    /// Sets the adult count and clears the children, as re-entering the
    /// adults step always starts the children list over.
    pub fn set_adults(&mut self, index: usize, adults: u8) -> Result<(), BookingError> {
        validate_adults(adults)?;
        let room = self.room_mut(index)?;
        room.adults = Some(adults);
        room.children.clear();
        Ok(())
    }

    /// Appends a child age. Returns the children count afterwards.
    pub fn add_child(&mut self, index: usize, age: u8) -> Result<usize, BookingError> {
        validate_age(age)?;
        let room = self.room_mut(index)?;
        if room.children.len() >= MAX_CHILDREN {
            return Err(BookingError::ChildLimitReached {
                room: index,
                max: MAX_CHILDREN,
            });
        }
        room.children.push(age);
        Ok(room.children.len())
    }

    /// Removes the room at `index`. Rooms after it shift down by one.
    pub fn delete(&mut self, index: usize) -> Result<RoomDraft, BookingError> {
        self.check_index(index)?;
        Ok(self.rooms.remove(index))
    }

    /// Sum of adults across rooms.
    pub fn total_adults(&self) -> usize {
        self.rooms
            .iter()
            .map(|r| usize::from(r.adults.unwrap_or(0)))
            .sum()
    }

    /// Sum of children across rooms.
    pub fn total_children(&self) -> usize {
        self.rooms.iter().map(|r| r.children.len()).sum()
    }

    /// Everyone staying, adults and children.
    pub fn occupancy(&self) -> usize {
        self.rooms.iter().map(RoomDraft::occupancy).sum()
    }

    fn check_index(&self, index: usize) -> Result<(), BookingError> {
        if index >= self.rooms.len() {
            return Err(BookingError::RoomOutOfRange {
                room: index,
                total: self.rooms.len(),
            });
        }
        Ok(())
    }

    fn room_mut(&mut self, index: usize) -> Result<&mut RoomDraft, BookingError> {
        let total = self.rooms.len();
        self.rooms
            .get_mut(index)
            .ok_or(BookingError::RoomOutOfRange { room: index, total })
    }
}
