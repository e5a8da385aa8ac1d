//! Hotel Search Port - interface for the hotel search backend.

use async_trait::async_trait;

use crate::domain::booking::SearchCriteria;
use crate::domain::search::HotelOffer;

/// Errors from the hotel search backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Network(String),

    #[error("search timed out")]
    Timeout,

    #[error("malformed search response: {0}")]
    Parse(String),

    #[error("search rejected: {0}")]
    Rejected(String),
}

/// Port for hotel search.
///
/// Backends return one page of offers in their own order; ranking and
/// truncation happen in the domain.
#[async_trait]
pub trait HotelSearch: Send + Sync {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<HotelOffer>, SearchError>;

    /// Up to `count` photo URLs of a hotel.
    async fn photos(&self, hotel_id: i64, count: usize) -> Result<Vec<String>, SearchError>;
}
