//! Ordering and filtering of hotel offers per search variant.

use std::cmp::Ordering;

use super::hotel::HotelOffer;
use crate::domain::booking::SearchCommand;

/// Offers in display order, plus the closest distance seen when a distance
/// filter removed everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedOffers {
    pub offers: Vec<HotelOffer>,
    pub min_distance: Option<f64>,
}

impl RankedOffers {
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

/// Orders `offers` for `command` and keeps at most `limit`.
///
/// - low price: nightly price ascending
/// - high price: nightly price descending
/// - best deal: price ascending, then only offers within `max_distance`,
///   then distance ascending (stable, so equal distances stay cheapest first)
///
/// Offers without a price sort last in both price orders. Offers without a
/// distance never pass the best-deal filter and are ignored by the minimum.
pub fn rank(
    command: SearchCommand,
    mut offers: Vec<HotelOffer>,
    max_distance: Option<f64>,
    limit: usize,
) -> RankedOffers {
    let descending = matches!(command, SearchCommand::HighPrice);
    offers.sort_by(|a, b| by_price(a, b, descending));

    let mut min_distance = None;
    if let SearchCommand::BestDeal = command {
        let max = max_distance.unwrap_or(f64::INFINITY);
        let all_distances: Vec<f64> = offers.iter().filter_map(|o| o.distance_km).collect();
        offers.retain(|o| matches!(o.distance_km, Some(d) if d <= max));
        offers.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        });
        if offers.is_empty() {
            min_distance = all_distances.into_iter().reduce(f64::min);
        }
    }

    offers.truncate(limit);
    RankedOffers {
        offers,
        min_distance,
    }
}

fn by_price(a: &HotelOffer, b: &HotelOffer, descending: bool) -> Ordering {
    match (a.nightly_price, b.nightly_price) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
