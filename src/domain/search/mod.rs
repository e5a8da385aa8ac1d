//! Search module - hotel offers, result ranking and search history records.

mod history;
mod hotel;
mod ranking;

pub use history::{HistoryRecord, HotelRef};
pub use hotel::{escape_html, hotel_link, trim_float, DestinationCandidate, HotelOffer};
pub use ranking::{rank, RankedOffers};
