//! The finalized search request assembled from a finished booking form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::command::SearchCommand;
use crate::domain::controls::menus::MAX_PHOTOS;
use crate::domain::foundation::ValidationError;

/// Nightly price bounds, `min <= max`, both non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    /// Builds a range from two bounds given in either order.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` if a bound is negative or not finite.
    pub fn new(a: f64, b: f64) -> Result<Self, ValidationError> {
        if !(a.is_finite() && b.is_finite()) || a < 0.0 || b < 0.0 {
            return Err(ValidationError::invalid_format(
                "price_range",
                "prices must be non-negative numbers",
            ));
        }
        Ok(Self {
            min: a.min(b),
            max: a.max(b),
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Whether photos are shown with each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoRequest {
    None,
    Count(u8),
}

impl PhotoRequest {
    /// # Errors
    ///
    /// `OutOfRange` unless `count` is 1 through 10.
    pub fn count(count: u8) -> Result<Self, ValidationError> {
        if count == 0 || count > MAX_PHOTOS {
            return Err(ValidationError::out_of_range(
                "photo_count",
                1,
                MAX_PHOTOS.into(),
                count.into(),
            ));
        }
        Ok(PhotoRequest::Count(count))
    }

    /// Photos to fetch per hotel.
    pub fn wanted(&self) -> usize {
        match self {
            PhotoRequest::None => 0,
            PhotoRequest::Count(n) => usize::from(*n),
        }
    }
}

/// Guests of one room as sent to the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOccupancy {
    pub adults: u8,
    pub children: Vec<u8>,
}

/// Everything the search backend needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub destination_id: String,
    pub destination_name: String,
    pub hotel_count: u8,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rooms: Vec<RoomOccupancy>,
    pub command: SearchCommand,
    pub price_range: Option<PriceRange>,
    pub max_distance: Option<f64>,
    pub photos: PhotoRequest,
}

impl SearchCriteria {
    /// Nights between check-in and check-out, at least one.
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days().max(1);
        u32::try_from(days).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_range_rejects_negative_bounds() {
        assert!(PriceRange::new(-1.0, 5.0).is_err());
        assert!(PriceRange::new(f64::NAN, 5.0).is_err());
    }

    #[test]
    fn photo_count_is_bounded() {
        assert!(PhotoRequest::count(0).is_err());
        assert!(PhotoRequest::count(11).is_err());
        assert_eq!(PhotoRequest::count(3).unwrap().wanted(), 3);
        assert_eq!(PhotoRequest::None.wanted(), 0);
    }

    #[test]
    fn nights_between_dates() {
        let criteria = SearchCriteria {
            destination_id: "1".into(),
            destination_name: "Paris".into(),
            hotel_count: 3,
            check_in: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
            rooms: vec![RoomOccupancy { adults: 2, children: vec![] }],
            command: SearchCommand::LowPrice,
            price_range: None,
            max_distance: None,
            photos: PhotoRequest::None,
        };
        assert_eq!(criteria.nights(), 3);
    }
}
