//! Response shapes of the Hotels API and their mapping to domain values.

use serde::Deserialize;

use crate::domain::search::{DestinationCandidate, HotelOffer};

/// Landmark labels accepted as the distance reference point.
const CITY_CENTER_LABELS: [&str; 2] = ["City center", "Центр города"];

// ─────────────────────────────────────────────────────────────────────────────
// locations/v2/search
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(super) struct LocationSearchResponse {
    #[serde(default)]
    pub suggestions: Vec<SuggestionGroup>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SuggestionGroup {
    #[serde(default)]
    pub entities: Vec<LocationEntity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocationEntity {
    pub destination_id: String,
    pub caption: String,
}

impl LocationSearchResponse {
    /// Candidates of the first suggestion group (cities), caption markup
    /// removed.
    pub fn into_candidates(self) -> Vec<DestinationCandidate> {
        self.suggestions
            .into_iter()
            .next()
            .map(|group| {
                group
                    .entities
                    .into_iter()
                    .map(|e| DestinationCandidate::new(e.destination_id, strip_tags(&e.caption)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// properties/list
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(super) struct PropertyListResponse {
    pub data: PropertyListData,
}

#[derive(Debug, Deserialize)]
pub(super) struct PropertyListData {
    pub body: PropertyListBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PropertyListBody {
    pub search_results: SearchResults,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchResults {
    #[serde(default)]
    pub results: Vec<Property>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Property {
    pub id: i64,
    pub name: String,
    pub star_rating: Option<f64>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    pub rate_plan: Option<RatePlan>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Address {
    pub street_address: Option<String>,
    pub locality: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Landmark {
    pub label: String,
    pub distance: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RatePlan {
    pub price: Option<Price>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Price {
    pub exact_current: Option<f64>,
}

impl PropertyListResponse {
    pub fn into_offers(self) -> Vec<HotelOffer> {
        self.data
            .body
            .search_results
            .results
            .into_iter()
            .map(Property::into_offer)
            .collect()
    }
}

impl Property {
    fn into_offer(self) -> HotelOffer {
        let distance_km = self
            .landmarks
            .iter()
            .find(|l| CITY_CENTER_LABELS.contains(&l.label.as_str()))
            .and_then(|l| parse_distance(&l.distance));
        let nightly_price = self
            .rate_plan
            .and_then(|plan| plan.price)
            .and_then(|price| price.exact_current);
        let address = match (self.address.locality, self.address.street_address) {
            (Some(locality), Some(street)) => format!("{}, {}", locality, street),
            (Some(locality), None) => locality,
            (None, Some(street)) => street,
            (None, None) => String::new(),
        };

        HotelOffer {
            id: self.id,
            name: self.name,
            star_rating: self.star_rating,
            address,
            distance_km,
            nightly_price,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// properties/get-hotel-photos
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PhotosResponse {
    #[serde(default)]
    pub room_images: Vec<PhotoGroup>,
    #[serde(default)]
    pub hotel_images: Vec<PhotoGroup>,
}

/// Either a single image or a group with nested images.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PhotoGroup {
    pub base_url: Option<String>,
    #[serde(default)]
    pub images: Vec<PhotoImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PhotoImage {
    pub base_url: String,
}

/// Size code substituted into `{size}` URL templates.
const PHOTO_SIZE: &str = "z";

impl PhotosResponse {
    /// Up to `count` URLs, room images first.
    pub fn into_urls(self, count: usize) -> Vec<String> {
        self.room_images
            .into_iter()
            .chain(self.hotel_images)
            .flat_map(|group| {
                if group.images.is_empty() {
                    group.base_url.into_iter().collect::<Vec<_>>()
                } else {
                    group.images.into_iter().map(|i| i.base_url).collect()
                }
            })
            .map(|url| url.replace("{size}", PHOTO_SIZE))
            .take(count)
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

/// "1,2 km" or "0.7 км" to kilometres.
fn parse_distance(text: &str) -> Option<f64> {
    text.split_whitespace()
        .next()
        .and_then(|n| n.replace(',', ".").parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
}

fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn location_candidates_drop_markup() {
        let raw = json!({
            "suggestions": [
                {"group": "CITY_GROUP", "entities": [
                    {"destinationId": "504261", "caption": "<span class='highlighted'>Pari</span>s, France"},
                    {"destinationId": "1632147", "caption": "Paris, Texas, USA"}
                ]},
                {"group": "HOTEL_GROUP", "entities": [
                    {"destinationId": "9", "caption": "Hotel Paris"}
                ]}
            ]
        });
        let response: LocationSearchResponse = serde_json::from_value(raw).unwrap();
        let candidates = response.into_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], DestinationCandidate::new("504261", "Paris, France"));
    }

    #[test]
    fn empty_suggestions_yield_no_candidates() {
        let response: LocationSearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.into_candidates().is_empty());
    }

    #[test]
    fn property_maps_to_offer() {
        let raw = json!({"data": {"body": {"searchResults": {"results": [
            {
                "id": 42,
                "name": "Le Petit",
                "starRating": 3.5,
                "address": {"locality": "Paris", "streetAddress": "1 Rue X"},
                "landmarks": [
                    {"label": "Eiffel Tower", "distance": "0,3 km"},
                    {"label": "City center", "distance": "1,2 km"}
                ],
                "ratePlan": {"price": {"exactCurrent": 54.2}}
            },
            {"id": 43, "name": "No Data"}
        ]}}}});
        let response: PropertyListResponse = serde_json::from_value(raw).unwrap();
        let offers = response.into_offers();

        assert_eq!(offers[0].distance_km, Some(1.2));
        assert_eq!(offers[0].nightly_price, Some(54.2));
        assert_eq!(offers[0].address, "Paris, 1 Rue X");
        assert_eq!(offers[1].distance_km, None);
        assert_eq!(offers[1].nightly_price, None);
        assert_eq!(offers[1].address, "");
    }

    #[test]
    fn distance_ignores_other_landmarks() {
        assert_eq!(parse_distance("2,5 км"), Some(2.5));
        assert_eq!(parse_distance("far"), None);
    }

    #[test]
    fn photos_fill_templates_and_stop_at_count() {
        let raw = json!({
            "roomImages": [{"images": [
                {"baseUrl": "https://img/r1_{size}.jpg"},
                {"baseUrl": "https://img/r2_{size}.jpg"}
            ]}],
            "hotelImages": [{"baseUrl": "https://img/h1_{size}.jpg"}]
        });
        let response: PhotosResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(
            response.into_urls(3),
            vec![
                "https://img/r1_z.jpg".to_string(),
                "https://img/r2_z.jpg".to_string(),
                "https://img/h1_z.jpg".to_string(),
            ]
        );
    }
}
