//! Linear stage progression of the booking wizard.
//!
//! The stage field is a high-water mark. Handlers bound to an earlier stage
//! may still run (the user can revise old answers), but only a strictly later
//! stage moves the mark forward.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in the fixed booking sequence. Declaration order is the
/// progression order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Start,
    Locate,
    ChooseHotelCount,
    ChooseCheckIn,
    ChooseCheckOut,
    OpenRoom,
    AskChildren,
    CollectChildren,
    SetPriceRange,
    SetMaxDistance,
}

impl Stage {
    /// All stages in progression order.
    pub const ALL: [Stage; 10] = [
        Stage::Start,
        Stage::Locate,
        Stage::ChooseHotelCount,
        Stage::ChooseCheckIn,
        Stage::ChooseCheckOut,
        Stage::OpenRoom,
        Stage::AskChildren,
        Stage::CollectChildren,
        Stage::SetPriceRange,
        Stage::SetMaxDistance,
    ];

    /// Zero-based position in the sequence.
    pub fn position(&self) -> usize {
        *self as usize
    }

    /// Moves `self` to `target` if `target` is strictly later.
    ///
    /// Returns true when the stage changed. Never fails: re-entering an
    /// earlier or equal stage is a no-op.
    pub fn advance_to(&mut self, target: Stage) -> bool {
        if target > *self {
            *self = target;
            true
        } else {
            false
        }
    }

    /// True if `target` would move the mark forward.
    pub fn precedes(&self, target: Stage) -> bool {
        *self < target
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Start => "start",
            Stage::Locate => "locate",
            Stage::ChooseHotelCount => "choose_hotel_count",
            Stage::ChooseCheckIn => "choose_check_in",
            Stage::ChooseCheckOut => "choose_check_out",
            Stage::OpenRoom => "open_room",
            Stage::AskChildren => "ask_children",
            Stage::CollectChildren => "collect_children",
            Stage::SetPriceRange => "set_price_range",
            Stage::SetMaxDistance => "set_max_distance",
        };
        f.write_str(s)
    }
}
