//! Pre-submission check run when the user presses "Start search".

use chrono::NaiveDate;
use std::fmt;

use super::guest_cycle::GuestCycle;
use super::room_registry::RoomRegistry;

/// Most guests a single search may carry, adults and children together.
pub const MAX_OCCUPANCY: usize = 20;

/// One reason the form cannot be submitted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    EqualDates,
    InvertedDates,
    OccupancyExceeded { total: usize },
    RoomOpen { room: usize },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::EqualDates => f.write_str("Check-in and check-out fall on the same day."),
            Finding::InvertedDates => f.write_str("Check-out is earlier than check-in."),
            Finding::OccupancyExceeded { total } => write!(
                f,
                "{} guests selected, at most {} are allowed.",
                total, MAX_OCCUPANCY
            ),
            Finding::RoomOpen { room } => {
                write!(f, "Finish filling in room {} first.", room + 1)
            }
        }
    }
}

/// Every finding of one validation run, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn is_ok(&self) -> bool {
        self.findings.is_empty()
    }

    /// All findings, one per line. Empty when the form is valid.
    pub fn message(&self) -> String {
        self.findings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Runs every check; none short-circuits another. Dates are compared only
/// once both are chosen.
pub fn validate(
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    rooms: &RoomRegistry,
    cycle: &GuestCycle,
) -> ValidationReport {
    let mut findings = Vec::new();

    if let (Some(start), Some(end)) = (check_in, check_out) {
        if start == end {
            findings.push(Finding::EqualDates);
        } else if start > end {
            findings.push(Finding::InvertedDates);
        }
    }

    let total = rooms.occupancy();
    if total > MAX_OCCUPANCY {
        findings.push(Finding::OccupancyExceeded { total });
    }

    if let Some(room) = cycle.open_room() {
        findings.push(Finding::RoomOpen { room });
    }

    ValidationReport { findings }
}
