//! Mock hotel service for testing.
//!
//! Serves canned destination candidates, offers and photos, records every
//! search it receives and can be told to fail.
//!
//! ```ignore
//! let hotels = MockHotelService::new()
//!     .with_destination("pari", vec![DestinationCandidate::new("1", "Paris, France")])
//!     .with_offers(offers);
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::booking::SearchCriteria;
use crate::domain::search::{DestinationCandidate, HotelOffer};
use crate::ports::{DestinationLookup, HotelSearch, LookupError, SearchError};

#[derive(Debug, Default)]
struct MockState {
    destinations: HashMap<String, Vec<DestinationCandidate>>,
    offers: Vec<HotelOffer>,
    photos: HashMap<i64, Vec<String>>,
    lookup_error: Option<LookupError>,
    search_error: Option<SearchError>,
    photo_error: Option<SearchError>,
    lookups: Vec<String>,
    searches: Vec<SearchCriteria>,
}

/// In-process stand-in for the hotels API.
#[derive(Debug, Clone, Default)]
pub struct MockHotelService {
    state: Arc<Mutex<MockState>>,
}

impl MockHotelService {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Candidates for a query, matched case-insensitively.
    pub fn with_destination(self, query: &str, candidates: Vec<DestinationCandidate>) -> Self {
        self.state().destinations.insert(query.to_lowercase(), candidates);
        self
    }

    pub fn with_offers(self, offers: Vec<HotelOffer>) -> Self {
        self.state().offers = offers;
        self
    }

    pub fn with_photos(self, hotel_id: i64, urls: Vec<String>) -> Self {
        self.state().photos.insert(hotel_id, urls);
        self
    }

    pub fn fail_lookups(&self, error: LookupError) {
        self.state().lookup_error = Some(error);
    }

    pub fn fail_searches(&self, error: SearchError) {
        self.state().search_error = Some(error);
    }

    pub fn fail_photos(&self, error: SearchError) {
        self.state().photo_error = Some(error);
    }

    /// Queries received, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.state().lookups.clone()
    }

    /// Criteria received, in order.
    pub fn searches(&self) -> Vec<SearchCriteria> {
        self.state().searches.clone()
    }
}

#[async_trait]
impl DestinationLookup for MockHotelService {
    async fn lookup(&self, query: &str) -> Result<Vec<DestinationCandidate>, LookupError> {
        let mut state = self.state();
        state.lookups.push(query.to_string());
        if let Some(err) = state.lookup_error.clone() {
            return Err(err);
        }
        Ok(state
            .destinations
            .get(&query.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl HotelSearch for MockHotelService {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<HotelOffer>, SearchError> {
        let mut state = self.state();
        state.searches.push(criteria.clone());
        if let Some(err) = state.search_error.clone() {
            return Err(err);
        }
        Ok(state.offers.clone())
    }

    async fn photos(&self, hotel_id: i64, count: usize) -> Result<Vec<String>, SearchError> {
        let state = self.state();
        if let Some(err) = state.photo_error.clone() {
            return Err(err);
        }
        Ok(state
            .photos
            .get(&hotel_id)
            .map(|urls| urls.iter().take(count).cloned().collect())
            .unwrap_or_default())
    }
}
