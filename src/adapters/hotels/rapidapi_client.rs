//! Hotels API client (RapidAPI `hotels4`).
//!
//! Implements both the DestinationLookup and HotelSearch ports over three
//! GET endpoints:
//!
//! - `locations/v2/search` - destination disambiguation
//! - `properties/list` - one page of offers for the criteria
//! - `properties/get-hotel-photos` - photo URLs of one hotel
//!
//! # Configuration
//!
//! ```ignore
//! let config = HotelsApiConfig::new(api_key)
//!     .with_locale("en_US")
//!     .with_currency("EUR");
//!
//! let client = RapidApiHotelsClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{LocationSearchResponse, PhotosResponse, PropertyListResponse};
use crate::domain::booking::{SearchCommand, SearchCriteria};
use crate::domain::search::{DestinationCandidate, HotelOffer};
use crate::ports::{DestinationLookup, HotelSearch, LookupError, SearchError};

/// Configuration for the Hotels API client.
#[derive(Debug, Clone)]
pub struct HotelsApiConfig {
    api_key: Secret<String>,
    /// Value of the `X-RapidAPI-Host` header.
    pub api_host: String,
    pub base_url: String,
    pub locale: String,
    pub currency: String,
    pub timeout: Duration,
    /// Offers requested per search; ranking keeps the best of this page.
    pub page_size: u32,
}

impl HotelsApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            api_host: "hotels4.p.rapidapi.com".to_string(),
            base_url: "https://hotels4.p.rapidapi.com".to_string(),
            locale: "en_US".to_string(),
            currency: "USD".to_string(),
            timeout: Duration::from_secs(15),
            page_size: 25,
        }
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Why a request failed, before mapping to the port's error type.
#[derive(Debug)]
enum RequestFailure {
    Timeout,
    Network(String),
    Status(StatusCode),
    Parse(String),
}

impl From<RequestFailure> for LookupError {
    fn from(failure: RequestFailure) -> Self {
        match failure {
            RequestFailure::Timeout => LookupError::Timeout,
            RequestFailure::Network(msg) => LookupError::Network(msg),
            RequestFailure::Status(status) => LookupError::Network(format!("HTTP {}", status)),
            RequestFailure::Parse(msg) => LookupError::Parse(msg),
        }
    }
}

impl From<RequestFailure> for SearchError {
    fn from(failure: RequestFailure) -> Self {
        match failure {
            RequestFailure::Timeout => SearchError::Timeout,
            RequestFailure::Network(msg) => SearchError::Network(msg),
            RequestFailure::Status(status) if status.is_client_error() => {
                SearchError::Rejected(format!("HTTP {}", status))
            }
            RequestFailure::Status(status) => SearchError::Network(format!("HTTP {}", status)),
            RequestFailure::Parse(msg) => SearchError::Parse(msg),
        }
    }
}

/// Hotels API client.
pub struct RapidApiHotelsClient {
    config: HotelsApiConfig,
    client: Client,
}

impl RapidApiHotelsClient {
    /// Creates a client with a request timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Network` if the HTTP client cannot be built.
    pub fn new(config: HotelsApiConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<T, RequestFailure> {
        let response = self
            .client
            .get(self.url(endpoint))
            .header("X-RapidAPI-Key", self.config.api_key())
            .header("X-RapidAPI-Host", &self.config.api_host)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RequestFailure::Timeout
                } else {
                    RequestFailure::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailure::Status(status));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                RequestFailure::Timeout
            } else {
                RequestFailure::Parse(e.to_string())
            }
        })
    }

    fn list_query(&self, criteria: &SearchCriteria) -> Vec<(String, String)> {
        list_query(&self.config, criteria)
    }
}

#[async_trait]
impl DestinationLookup for RapidApiHotelsClient {
    #[tracing::instrument(skip(self))]
    async fn lookup(&self, query: &str) -> Result<Vec<DestinationCandidate>, LookupError> {
        let params = vec![
            ("query".to_string(), query.to_string()),
            ("locale".to_string(), self.config.locale.clone()),
            ("currency".to_string(), self.config.currency.clone()),
        ];
        let response: LocationSearchResponse = self.get("locations/v2/search", &params).await?;
        let candidates = response.into_candidates();
        tracing::debug!(count = candidates.len(), "destination candidates");
        Ok(candidates)
    }
}

#[async_trait]
impl HotelSearch for RapidApiHotelsClient {
    #[tracing::instrument(skip(self, criteria), fields(destination = %criteria.destination_id))]
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<HotelOffer>, SearchError> {
        let response: PropertyListResponse =
            self.get("properties/list", &self.list_query(criteria)).await?;
        let offers = response.into_offers();
        tracing::debug!(count = offers.len(), "hotel offers");
        Ok(offers)
    }

    async fn photos(&self, hotel_id: i64, count: usize) -> Result<Vec<String>, SearchError> {
        let params = vec![("id".to_string(), hotel_id.to_string())];
        let response: PhotosResponse = self.get("properties/get-hotel-photos", &params).await?;
        Ok(response.into_urls(count))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn sort_order(command: SearchCommand) -> &'static str {
    match command {
        SearchCommand::LowPrice => "PRICE",
        SearchCommand::HighPrice => "PRICE_HIGHEST_FIRST",
        SearchCommand::BestDeal => "DISTANCE_FROM_LANDMARK",
    }
}

/// Query of `properties/list`. Rooms are numbered from 1: `adults1`,
/// `children1` (comma separated ages, omitted when empty), `adults2`, ...
fn list_query(config: &HotelsApiConfig, criteria: &SearchCriteria) -> Vec<(String, String)> {
    let mut query = vec![
        ("destinationId".to_string(), criteria.destination_id.clone()),
        ("pageNumber".to_string(), "1".to_string()),
        ("pageSize".to_string(), config.page_size.to_string()),
        ("checkIn".to_string(), criteria.check_in.format("%Y-%m-%d").to_string()),
        ("checkOut".to_string(), criteria.check_out.format("%Y-%m-%d").to_string()),
        ("sortOrder".to_string(), sort_order(criteria.command).to_string()),
        ("locale".to_string(), config.locale.clone()),
        ("currency".to_string(), config.currency.clone()),
    ];

    for (i, room) in criteria.rooms.iter().enumerate() {
        let n = i + 1;
        query.push((format!("adults{}", n), room.adults.to_string()));
        if !room.children.is_empty() {
            let ages: Vec<String> = room.children.iter().map(u8::to_string).collect();
            query.push((format!("children{}", n), ages.join(",")));
        }
    }

    if let Some(range) = criteria.price_range {
        query.push(("priceMin".to_string(), (range.min().floor() as u64).to_string()));
        query.push(("priceMax".to_string(), (range.max().ceil() as u64).to_string()));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{PhotoRequest, PriceRange, RoomOccupancy};
    use chrono::NaiveDate;

    fn criteria(command: SearchCommand) -> SearchCriteria {
        SearchCriteria {
            destination_id: "504261".to_string(),
            destination_name: "Paris, France".to_string(),
            hotel_count: 3,
            check_in: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
            rooms: vec![
                RoomOccupancy { adults: 2, children: vec![4, 9] },
                RoomOccupancy { adults: 1, children: vec![] },
            ],
            command,
            price_range: None,
            max_distance: None,
            photos: PhotoRequest::None,
        }
    }

    fn value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
        query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn list_query_numbers_rooms_from_one() {
        let query = list_query(&HotelsApiConfig::new("key"), &criteria(SearchCommand::LowPrice));
        assert_eq!(value(&query, "adults1"), Some("2"));
        assert_eq!(value(&query, "children1"), Some("4,9"));
        assert_eq!(value(&query, "adults2"), Some("1"));
        assert_eq!(value(&query, "children2"), None);
        assert_eq!(value(&query, "checkIn"), Some("2025-06-01"));
        assert_eq!(value(&query, "sortOrder"), Some("PRICE"));
        assert_eq!(value(&query, "priceMin"), None);
    }

    #[test]
    fn list_query_carries_price_range_for_best_deal() {
        let mut c = criteria(SearchCommand::BestDeal);
        c.price_range = Some(PriceRange::new(120.5, 40.2).unwrap());
        let query = list_query(&HotelsApiConfig::new("key"), &c);
        assert_eq!(value(&query, "priceMin"), Some("40"));
        assert_eq!(value(&query, "priceMax"), Some("121"));
        assert_eq!(value(&query, "sortOrder"), Some("DISTANCE_FROM_LANDMARK"));
    }

    #[test]
    fn url_joins_base_and_endpoint() {
        let client = RapidApiHotelsClient::new(
            HotelsApiConfig::new("key").with_base_url("http://localhost:9000/"),
        )
        .unwrap();
        assert_eq!(client.url("properties/list"), "http://localhost:9000/properties/list");
    }

    #[test]
    fn client_errors_are_rejections() {
        let err: SearchError = RequestFailure::Status(StatusCode::FORBIDDEN).into();
        assert!(matches!(err, SearchError::Rejected(_)));
        let err: LookupError = RequestFailure::Timeout.into();
        assert_eq!(err, LookupError::Timeout);
    }
}
