//! Hotels API Adapters
//!
//! - **RapidApiHotelsClient** - destination lookup, search and photos over HTTP
//! - **MockHotelService** - canned responses for tests

mod dto;
mod mock_hotel_service;
mod rapidapi_client;

pub use mock_hotel_service::MockHotelService;
pub use rapidapi_client::{HotelsApiConfig, RapidApiHotelsClient};
