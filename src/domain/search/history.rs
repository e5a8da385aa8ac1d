//! Compact records of past searches.

use serde::{Deserialize, Serialize};

use super::hotel::{escape_html, hotel_link};
use crate::domain::booking::SearchCommand;
use crate::domain::foundation::{HistoryRecordId, Timestamp, UserId};

/// A hotel shown to the user, enough to rebuild its link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelRef {
    pub id: i64,
    pub name: String,
}

/// One completed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryRecordId,
    pub user_id: UserId,
    pub created_at: Timestamp,
    pub command: SearchCommand,
    pub location: String,
    pub hotels: Vec<HotelRef>,
}

impl HistoryRecord {
    pub fn new(
        user_id: UserId,
        created_at: Timestamp,
        command: SearchCommand,
        location: impl Into<String>,
        hotels: Vec<HotelRef>,
    ) -> Self {
        Self {
            id: HistoryRecordId::new(),
            user_id,
            created_at,
            command,
            location: location.into(),
            hotels,
        }
    }

    /// Message text for `/history`, HTML formatted.
    pub fn render(&self) -> String {
        let mut text = format!(
            "<b>{}</b>\n{}\n{}\n",
            escape_html(&self.location),
            self.created_at.display(),
            self.command,
        );
        for hotel in &self.hotels {
            text.push_str(&format!(
                "\n<a href=\"{}\">{}</a>",
                hotel_link(hotel.id),
                escape_html(&hotel.name)
            ));
        }
        text
    }
}
