//! Destinations and hotel offers as returned by the search backend.

use serde::{Deserialize, Serialize};

/// Base of public hotel pages; the hotel id and a slash are appended.
pub const HOTEL_LINK_BASE: &str = "https://www.hotels.com/ho";

/// One entry of a destination disambiguation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationCandidate {
    pub id: String,
    pub name: String,
}

impl DestinationCandidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A hotel from a search result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    pub id: i64,
    pub name: String,
    pub star_rating: Option<f64>,
    pub address: String,
    /// Kilometres to the city centre, when the backend reports it.
    pub distance_km: Option<f64>,
    /// Exact price per night in the configured currency.
    pub nightly_price: Option<f64>,
}

impl HotelOffer {
    /// Price per night rounded up to a whole unit.
    pub fn rounded_nightly(&self) -> Option<u64> {
        self.nightly_price
            .filter(|p| p.is_finite() && *p >= 0.0)
            .map(|p| p.ceil() as u64)
    }

    /// Rounded nightly price times `nights`.
    pub fn total_price(&self, nights: u32) -> Option<u64> {
        self.rounded_nightly().map(|p| p * u64::from(nights))
    }

    /// One star per started rating point.
    pub fn rating_stars(&self) -> Option<String> {
        self.star_rating
            .filter(|r| r.is_finite() && *r > 0.0)
            .map(|r| "★".repeat(r.ceil() as usize))
    }

    pub fn link(&self) -> String {
        hotel_link(self.id)
    }

    /// Message body for this offer, HTML formatted.
    pub fn render(&self, nights: u32, currency: &str) -> String {
        let price = |value: Option<u64>| match value {
            Some(v) => format!("{}{}", v, currency_sign(currency)),
            None => "price unavailable".to_string(),
        };
        let distance = match self.distance_km {
            Some(km) => format!("{} km", trim_float(km)),
            None => "unknown".to_string(),
        };

        format!(
            "<b>Hotel:</b> {}\n<b>Rating:</b> {}\n<b>Address:</b> {}\n<b>To the centre:</b> {}\n<b>Per night:</b> {}\n<b>Total:</b> {}\n\n<a href=\"{}\">View on hotels.com</a>",
            escape_html(&self.name),
            self.rating_stars().unwrap_or_else(|| "no rating".to_string()),
            escape_html(&self.address),
            distance,
            price(self.rounded_nightly()),
            price(self.total_price(nights)),
            self.link(),
        )
    }
}

pub fn hotel_link(id: i64) -> String {
    format!("{}{}/", HOTEL_LINK_BASE, id)
}

fn currency_sign(currency: &str) -> String {
    match currency {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "RUB" => "₽".to_string(),
        other => format!(" {}", other),
    }
}

/// Formats `2.0` as `2` and `1.25` as `1.25`.
pub fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Escapes text for the chat platform's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
