//! Summary memory and the renderer for the two live summary messages.
//!
//! The memory mirrors each answered step as a tagged node. Rendering is a
//! pure walk over it, so a live message is always an exact projection of the
//! memory: mutate, re-render, edit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::controls::InlineKeyboard;

/// How to re-show the control a scalar answer was given with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlRef {
    /// The keyboard as last shown, with the answer marked.
    Keyboard(InlineKeyboard),
    /// Payload of the calendar button that produced the answer.
    CalendarPick(String),
}

/// One rendered answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarField {
    pub text: String,
    pub control: Option<ControlRef>,
}

impl ScalarField {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            control: None,
        }
    }

    pub fn with_control(mut self, control: ControlRef) -> Self {
        self.control = Some(control);
        self
    }

    /// The stored keyboard, if this answer came from one.
    pub fn keyboard(&self) -> Option<&InlineKeyboard> {
        match &self.control {
            Some(ControlRef::Keyboard(kb)) => Some(kb),
            _ => None,
        }
    }
}

/// Summary of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub adults: ScalarField,
    pub children: Option<ScalarField>,
}

/// Room summaries keyed by room index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomsBranch {
    rooms: BTreeMap<usize, RoomSummary>,
}

impl RoomsBranch {
    pub fn get(&self, room: usize) -> Option<&RoomSummary> {
        self.rooms.get(&room)
    }

    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.rooms.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Starts `room` over with only its adults line.
    pub fn set_adults(&mut self, room: usize, adults: ScalarField) {
        self.rooms.insert(
            room,
            RoomSummary {
                adults,
                children: None,
            },
        );
    }

    /// Sets the children line of an existing room. Returns false if the room
    /// has no summary yet.
    pub fn set_children(&mut self, room: usize, children: ScalarField) -> bool {
        match self.rooms.get_mut(&room) {
            Some(summary) => {
                summary.children = Some(children);
                true
            }
            None => false,
        }
    }

    /// Removes `room` and renumbers every later room down by one.
    pub fn remove_and_shift(&mut self, room: usize) {
        self.rooms.remove(&room);
        let later: Vec<usize> = self.rooms.range(room + 1..).map(|(k, _)| *k).collect();
        for key in later {
            if let Some(summary) = self.rooms.remove(&key) {
                self.rooms.insert(key - 1, summary);
            }
        }
    }

    /// Text of the rooms summary: a header per room, then its lines, in room
    /// order.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for (room, summary) in &self.rooms {
            text.push_str(&format!("Room {}:\n", room + 1));
            text.push_str(&summary.adults.text);
            text.push('\n');
            if let Some(children) = &summary.children {
                text.push_str(&children.text);
                text.push('\n');
            }
        }
        text
    }
}

/// Position of a scalar line in the overall summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySlot {
    Location,
    HotelCount,
    CheckIn,
    CheckOut,
}

/// A node of the summary memory, as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryNode<'a> {
    Scalar(&'a ScalarField),
    Rooms(&'a RoomsBranch),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SummaryEntry {
    slot: SummarySlot,
    field: ScalarField,
}

/// Everything the live summaries show, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMemory {
    scalars: Vec<SummaryEntry>,
    rooms: RoomsBranch,
}

impl SummaryMemory {
    /// Empty memory with an empty rooms branch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scalar stored under `slot`.
    pub fn scalar(&self, slot: SummarySlot) -> Option<&ScalarField> {
        self.scalars
            .iter()
            .find(|e| e.slot == slot)
            .map(|e| &e.field)
    }

    pub fn has(&self, slot: SummarySlot) -> bool {
        self.scalar(slot).is_some()
    }

    /// Stores `field` under `slot`, keeping slot order.
    pub fn set_scalar(&mut self, slot: SummarySlot, field: ScalarField) {
        match self.scalars.iter_mut().find(|e| e.slot == slot) {
            Some(entry) => entry.field = field,
            None => {
                let at = self
                    .scalars
                    .iter()
                    .position(|e| e.slot > slot)
                    .unwrap_or(self.scalars.len());
                self.scalars.insert(at, SummaryEntry { slot, field });
            }
        }
    }

    pub fn rooms(&self) -> &RoomsBranch {
        &self.rooms
    }

    pub fn rooms_mut(&mut self) -> &mut RoomsBranch {
        &mut self.rooms
    }

    /// Nodes in display order; the rooms branch always comes last.
    pub fn nodes(&self) -> impl Iterator<Item = SummaryNode<'_>> {
        self.scalars
            .iter()
            .map(|e| SummaryNode::Scalar(&e.field))
            .chain(std::iter::once(SummaryNode::Rooms(&self.rooms)))
    }

    /// Text of the overall summary. Stops at the rooms branch, which has its
    /// own message.
    pub fn render_overall(&self) -> String {
        let mut text = String::new();
        for node in self.nodes() {
            match node {
                SummaryNode::Scalar(field) => {
                    text.push_str(&field.text);
                    text.push('\n');
                }
                SummaryNode::Rooms(_) => break,
            }
        }
        text
    }

    /// Text of the rooms summary.
    pub fn render_rooms(&self) -> String {
        self.nodes()
            .find_map(|node| match node {
                SummaryNode::Rooms(branch) => Some(branch.render()),
                SummaryNode::Scalar(_) => None,
            })
            .unwrap_or_default()
    }
}
