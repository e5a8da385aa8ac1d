//! Submission: validation on "Start search", then the photo question.

use tracing::{debug, info, warn};

use super::search::{SearchOrchestrator, SearchOutcome};
use super::texts;
use super::turn::Turn;
use crate::domain::booking::{PhotoRequest, TextPrompt};
use crate::domain::controls::menus;
use crate::domain::foundation::MessageId;
use crate::ports::TransportError;

/// "Start search" on the rooms summary.
///
/// Findings are shown with the button acknowledgement and nothing changes.
/// A valid form loses the controls of both summaries.
pub async fn finish(turn: &mut Turn<'_>, message_id: MessageId) -> Result<(), TransportError> {
    if turn.session.is_finished() || !turn.session.is_rooms_surface(message_id) {
        turn.outdated();
        return Ok(());
    }

    let surfaces = match turn.session.finish() {
        Ok(surfaces) => surfaces,
        Err(report) => {
            warn!(findings = report.findings().len(), "form rejected");
            turn.warn(report.message());
            return Ok(());
        }
    };
    info!(command = ?turn.session.command(), "form submitted");

    for surface in surfaces {
        turn.strip_controls(surface).await?;
    }
    turn.session.set_current_prompt(None);

    if turn.session.awaiting() == Some(TextPrompt::PriceRange) {
        turn.ask(texts::ASK_PRICE_RANGE, None).await?;
    } else {
        turn.ask(texts::ASK_PHOTOS, Some(menus::photo_question()))
            .await?;
    }
    Ok(())
}

fn photo_answer_open(turn: &Turn<'_>) -> bool {
    turn.session.ready_for_photos() && turn.session.photos().is_none()
}

/// "Yes" to photos: ask how many.
pub async fn photos_wanted(turn: &mut Turn<'_>, message_id: MessageId) -> Result<(), TransportError> {
    if !photo_answer_open(turn) {
        turn.outdated();
        return Ok(());
    }
    turn.delete(message_id).await?;
    turn.ask(texts::ASK_PHOTO_COUNT, Some(menus::photo_count()))
        .await?;
    Ok(())
}

/// "No" to photos, or a photo count: record it and run the search.
pub async fn photos_chosen(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    count: Option<u8>,
    orchestrator: &SearchOrchestrator,
) -> Result<Option<SearchOutcome>, TransportError> {
    if !photo_answer_open(turn) {
        turn.outdated();
        return Ok(None);
    }
    let request = match count {
        None => PhotoRequest::None,
        Some(n) => match PhotoRequest::count(n) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "photo count rejected");
                turn.outdated();
                return Ok(None);
            }
        },
    };
    if let Err(e) = turn.session.set_photos(request) {
        debug!(code = %e.code(), error = %e, "photo answer rejected");
        turn.outdated();
        return Ok(None);
    }

    turn.delete(message_id).await?;
    turn.session.set_current_prompt(None);
    orchestrator.run(turn).await.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;

    use crate::adapters::{FixedClock, InMemoryHistoryLog, MockHotelService, RecordingTransport};
    use crate::domain::booking::{BookingSession, SearchCommand, Stage};
    use crate::domain::controls::InlineKeyboard;
    use crate::domain::foundation::{ChatId, Timestamp, UserId};
    use crate::domain::search::DestinationCandidate;
    use crate::ports::{ChatTransport, OutgoingMessage};

    const CHAT: ChatId = ChatId::new(7);

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    /// A complete form with both summaries posted and room 0 open unless
    /// `close` is set.
    async fn filled(
        transport: &RecordingTransport,
        command: SearchCommand,
        check_out: u32,
        close: bool,
    ) -> BookingSession {
        let mut session = BookingSession::begin(UserId::new(1), CHAT, command);
        session
            .select_destination(DestinationCandidate::new("1", "Paris"), InlineKeyboard::default())
            .unwrap();
        session.set_hotel_count(2, InlineKeyboard::default()).unwrap();
        session.set_check_in(date(5), String::new()).unwrap();
        session.set_check_out(date(check_out), String::new()).unwrap();
        session.enter(Stage::OpenRoom);
        session.add_room().unwrap();
        session.supply_adults(0, 2, InlineKeyboard::default()).unwrap();
        if close {
            session.close_room(0).unwrap();
        }
        let summary = transport
            .send_message(
                CHAT,
                OutgoingMessage::text("summary").with_controls(menus::summary_edit()),
            )
            .await
            .unwrap();
        session.claim_summary_surface(summary);
        let rooms = transport
            .send_message(
                CHAT,
                OutgoingMessage::text("rooms").with_controls(menus::rooms_menu(1)),
            )
            .await
            .unwrap();
        session.claim_rooms_surface(rooms);
        session
    }

    fn orchestrator() -> SearchOrchestrator {
        SearchOrchestrator::new(
            Arc::new(MockHotelService::new()),
            Arc::new(InMemoryHistoryLog::new()),
            Arc::new(FixedClock::new(Timestamp::now())),
            "USD",
        )
    }

    mod validation {
        use super::*;

        #[tokio::test]
        async fn findings_are_shown_and_form_stays_open() {
            let transport = RecordingTransport::default();
            let session = filled(&transport, SearchCommand::LowPrice, 5, false).await;
            let rooms = session.surfaces().rooms.unwrap();
            let mut turn = Turn::new(&transport, session, CHAT);

            finish(&mut turn, rooms).await.unwrap();

            let notice = turn.notice().unwrap().to_string();
            assert_eq!(notice.lines().count(), 2);
            assert!(!turn.session.is_finished());
            assert!(transport.message(CHAT, rooms).unwrap().controls.is_some());
        }

        #[tokio::test]
        async fn valid_form_strips_both_summaries() {
            let transport = RecordingTransport::default();
            let session = filled(&transport, SearchCommand::LowPrice, 8, true).await;
            let surfaces = session.surfaces();
            let mut turn = Turn::new(&transport, session, CHAT);

            finish(&mut turn, surfaces.rooms.unwrap()).await.unwrap();

            assert!(turn.session.is_finished());
            for id in [surfaces.summary.unwrap(), surfaces.rooms.unwrap()] {
                assert!(transport.message(CHAT, id).unwrap().controls.is_none());
            }
            let (_, asked) = transport.last_sent(CHAT).unwrap();
            assert_eq!(asked.text, texts::ASK_PHOTOS);
        }

        #[tokio::test]
        async fn best_deal_asks_for_price_first() {
            let transport = RecordingTransport::default();
            let session = filled(&transport, SearchCommand::BestDeal, 8, true).await;
            let rooms = session.surfaces().rooms.unwrap();
            let mut turn = Turn::new(&transport, session, CHAT);

            finish(&mut turn, rooms).await.unwrap();

            assert_eq!(turn.session.awaiting(), Some(TextPrompt::PriceRange));
            assert_eq!(transport.last_sent(CHAT).unwrap().1.text, texts::ASK_PRICE_RANGE);
        }

        #[tokio::test]
        async fn second_finish_is_outdated() {
            let transport = RecordingTransport::default();
            let session = filled(&transport, SearchCommand::LowPrice, 8, true).await;
            let rooms = session.surfaces().rooms.unwrap();
            let mut turn = Turn::new(&transport, session, CHAT);
            finish(&mut turn, rooms).await.unwrap();

            finish(&mut turn, rooms).await.unwrap();

            assert_eq!(turn.notice(), Some(texts::OUTDATED));
        }
    }

    mod photos {
        use super::*;

        #[tokio::test]
        async fn yes_asks_for_a_count() {
            let transport = RecordingTransport::default();
            let session = filled(&transport, SearchCommand::LowPrice, 8, true).await;
            let rooms = session.surfaces().rooms.unwrap();
            let mut turn = Turn::new(&transport, session, CHAT);
            finish(&mut turn, rooms).await.unwrap();
            let (question, _) = transport.last_sent(CHAT).unwrap();

            photos_wanted(&mut turn, question).await.unwrap();

            assert!(transport.is_deleted(CHAT, question));
            assert_eq!(transport.last_sent(CHAT).unwrap().1.text, texts::ASK_PHOTO_COUNT);
        }

        #[tokio::test]
        async fn answer_runs_the_search_once() {
            let transport = RecordingTransport::default();
            let session = filled(&transport, SearchCommand::LowPrice, 8, true).await;
            let rooms = session.surfaces().rooms.unwrap();
            let mut turn = Turn::new(&transport, session, CHAT);
            finish(&mut turn, rooms).await.unwrap();
            let (question, _) = transport.last_sent(CHAT).unwrap();
            let orchestrator = orchestrator();

            let outcome = photos_chosen(&mut turn, question, None, &orchestrator)
                .await
                .unwrap();
            assert_eq!(outcome, Some(SearchOutcome::NotFound { min_distance: None }));
            assert_eq!(turn.session.photos(), Some(PhotoRequest::None));

            let again = photos_chosen(&mut turn, question, Some(3), &orchestrator)
                .await
                .unwrap();
            assert_eq!(again, None);
            assert_eq!(turn.notice(), Some(texts::OUTDATED));
        }

        #[tokio::test]
        async fn photos_before_finish_are_outdated() {
            let transport = RecordingTransport::default();
            let session = filled(&transport, SearchCommand::LowPrice, 8, true).await;
            let mut turn = Turn::new(&transport, session, CHAT);

            photos_wanted(&mut turn, MessageId::new(1)).await.unwrap();

            assert_eq!(turn.notice(), Some(texts::OUTDATED));
        }
    }
}
