//! SearchOrchestrator - runs a finished form against the hotel backend,
//! posts the results and logs the search.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, warn};

use super::texts;
use super::turn::Turn;
use crate::domain::booking::SearchCriteria;
use crate::domain::search::{rank, HistoryRecord, HotelOffer, HotelRef};
use crate::ports::{Clock, HistoryLog, HotelSearch, OutgoingMessage, TransportError};

/// How a search ended, as far as the user saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The form is missing a value; nothing was searched.
    Incomplete,
    /// The backend failed.
    Unavailable,
    /// Nothing matched. `min_distance` is the closest hotel a distance
    /// filter removed.
    NotFound { min_distance: Option<f64> },
    /// `shown` results were posted.
    Delivered { shown: usize },
}

pub struct SearchOrchestrator {
    search: Arc<dyn HotelSearch>,
    history: Arc<dyn HistoryLog>,
    clock: Arc<dyn Clock>,
    currency: String,
}

impl SearchOrchestrator {
    pub fn new(
        search: Arc<dyn HotelSearch>,
        history: Arc<dyn HistoryLog>,
        clock: Arc<dyn Clock>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            search,
            history,
            clock,
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub async fn run(&self, turn: &mut Turn<'_>) -> Result<SearchOutcome, TransportError> {
        // 1. Assemble criteria
        let criteria = match turn.session.criteria() {
            Ok(criteria) => criteria,
            Err(e) => {
                error!(error = %e, "finished form is incomplete");
                turn.send_text(texts::SEARCH_UNAVAILABLE).await?;
                return Ok(SearchOutcome::Incomplete);
            }
        };
        turn.send_text(texts::SEARCHING).await?;

        // 2. Query the backend and rank
        let offers = match self.search.search(&criteria).await {
            Ok(offers) => offers,
            Err(e) => {
                warn!(error = %e, "hotel search failed");
                turn.send_text(texts::SEARCH_UNAVAILABLE).await?;
                return Ok(SearchOutcome::Unavailable);
            }
        };
        let ranked = rank(
            criteria.command,
            offers,
            criteria.max_distance,
            usize::from(criteria.hotel_count),
        );

        if ranked.is_empty() {
            let mut text = texts::NOTHING_FOUND.to_string();
            if let Some(distance) = ranked.min_distance {
                text.push('\n');
                text.push_str(&texts::closest_distance(distance));
            }
            turn.send_text(text).await?;
            info!(destination = %criteria.destination_name, "search found nothing");
            return Ok(SearchOutcome::NotFound {
                min_distance: ranked.min_distance,
            });
        }

        // 3. Post results
        let delivered = self.deliver(turn, &criteria, &ranked.offers).await;
        let shown = delivered.len();
        if shown < usize::from(criteria.hotel_count) {
            turn.send_text(texts::found_only(shown)).await?;
        }
        info!(shown, destination = %criteria.destination_name, "search results posted");

        // 4. Log the search
        let record = HistoryRecord::new(
            turn.session.user_id(),
            self.clock.now(),
            criteria.command,
            criteria.destination_name.clone(),
            delivered
                .iter()
                .map(|offer| HotelRef {
                    id: offer.id,
                    name: offer.name.clone(),
                })
                .collect(),
        );
        if let Err(e) = self.history.append(&record).await {
            warn!(error = %e, "search history not written");
        }

        Ok(SearchOutcome::Delivered { shown })
    }

    /// Posts one message (or album) per offer and returns the offers that
    /// reached the chat.
    async fn deliver<'o>(
        &self,
        turn: &Turn<'_>,
        criteria: &SearchCriteria,
        offers: &'o [HotelOffer],
    ) -> Vec<&'o HotelOffer> {
        let wanted = criteria.photos.wanted();
        let photos: Vec<Option<Vec<String>>> = if wanted > 0 {
            join_all(offers.iter().map(|offer| async move {
                match self.search.photos(offer.id, wanted).await {
                    Ok(urls) if !urls.is_empty() => Some(urls),
                    Ok(_) => None,
                    Err(e) => {
                        warn!(hotel = offer.id, error = %e, "photos unavailable");
                        None
                    }
                }
            }))
            .await
        } else {
            vec![None; offers.len()]
        };

        let nights = criteria.nights();
        let mut delivered = Vec::with_capacity(offers.len());
        for (offer, urls) in offers.iter().zip(photos) {
            let text = offer.render(nights, &self.currency);
            let sent = match urls {
                Some(urls) => turn
                    .transport()
                    .send_photo_album(turn.chat_id, &urls, &text)
                    .await
                    .map(drop),
                None if wanted > 0 => {
                    let text = format!("<i>{}</i>\n\n{}", texts::PHOTOS_UNAVAILABLE, text);
                    turn.send(OutgoingMessage::html(text)).await.map(drop)
                }
                None => turn.send(OutgoingMessage::html(text)).await.map(drop),
            };
            match sent {
                Ok(()) => delivered.push(offer),
                Err(e) => warn!(hotel = offer.id, error = %e, "result not delivered"),
            }
        }
        delivered
    }
}
