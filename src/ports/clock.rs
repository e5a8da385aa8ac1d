//! Clock Port - current date and time, swappable in tests.

use chrono::NaiveDate;

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Today's date in UTC.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
