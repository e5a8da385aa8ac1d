//! Clock Adapters
//!
//! - **SystemClock** - wall clock, UTC
//! - **FixedClock** - a settable instant for tests and replays

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock that returns a configured instant until moved.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<Timestamp>>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Moves the clock; clones observe the new instant.
    pub fn set(&self, now: Timestamp) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn fixed_clock_reports_configured_day() {
        let clock = FixedClock::new(Timestamp::from_datetime(
            Utc.with_ymd_and_hms(2025, 5, 30, 23, 59, 0).unwrap(),
        ));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 5, 30).unwrap());

        let shared = clock.clone();
        shared.set(Timestamp::from_datetime(
            Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap(),
        ));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    }

    #[test]
    fn system_clock_is_close_to_now() {
        let before = Timestamp::now();
        let now = SystemClock.now();
        assert!(!now.is_before(&before));
    }
}
