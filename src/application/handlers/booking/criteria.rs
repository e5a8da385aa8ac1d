//! Scalar criteria: hotel count, dates, summary edits, price range and
//! maximum distance.

use tracing::debug;

use super::texts;
use super::turn::Turn;
use crate::domain::booking::{parse_distance, parse_price_range, Stage, SummarySlot};
use crate::domain::controls::{
    menus, CalendarKind, CalendarOutcome, CalendarStep, InlineKeyboard, SummaryField,
};
use crate::domain::foundation::MessageId;
use crate::ports::TransportError;

/// True when `message_id` may still change the form: a live summary or the
/// question asked last.
fn accepts(turn: &Turn<'_>, message_id: MessageId) -> bool {
    let session = &turn.session;
    !session.is_finished()
        && (session.is_summary_surface(message_id)
            || session.current_prompt() == Some(message_id))
}

pub async fn hotel_count(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    count: u8,
    controls: Option<InlineKeyboard>,
) -> Result<(), TransportError> {
    if !accepts(turn, message_id) {
        turn.outdated();
        return Ok(());
    }

    let marked = controls
        .unwrap_or_else(menus::hotel_count)
        .marked(&count.to_string());
    if let Err(e) = turn.session.set_hotel_count(count, marked) {
        debug!(code = %e.code(), error = %e, "hotel count rejected");
        turn.outdated();
        return Ok(());
    }

    turn.refresh_summary().await?;
    turn.delete_prompt(message_id).await?;

    if turn.session.enter(Stage::ChooseCheckIn) {
        let calendar = turn.session.check_in_calendar(turn.today());
        turn.ask(texts::ASK_CHECK_IN, Some(calendar.initial())).await?;
    }
    Ok(())
}

/// A button of one of the two date pickers.
pub async fn calendar(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    kind: CalendarKind,
    step: CalendarStep,
    payload: &str,
) -> Result<(), TransportError> {
    if !accepts(turn, message_id) {
        turn.outdated();
        return Ok(());
    }

    let (calendar, question) = match kind {
        CalendarKind::CheckIn => (
            Some(turn.session.check_in_calendar(turn.today())),
            texts::ASK_CHECK_IN,
        ),
        CalendarKind::CheckOut => (turn.session.check_out_calendar(), texts::ASK_CHECK_OUT),
    };
    let Some(calendar) = calendar else {
        turn.outdated();
        return Ok(());
    };

    let date = match calendar.process(step) {
        CalendarOutcome::Month(month) => {
            let text = turn.text_over_surface(message_id, question);
            return turn.edit_text(message_id, &text, Some(month)).await;
        }
        CalendarOutcome::Rejected => return Ok(()),
        CalendarOutcome::Picked(date) => date,
    };

    let stored = match kind {
        CalendarKind::CheckIn => turn.session.set_check_in(date, payload.to_string()),
        CalendarKind::CheckOut => turn.session.set_check_out(date, payload.to_string()),
    };
    if let Err(e) = stored {
        debug!(code = %e.code(), error = %e, "date rejected");
        turn.outdated();
        return Ok(());
    }

    turn.refresh_summary().await?;
    turn.delete_prompt(message_id).await?;

    match kind {
        CalendarKind::CheckIn => {
            if turn.session.enter(Stage::ChooseCheckOut) {
                if let Some(next) = turn.session.check_out_calendar() {
                    turn.ask(texts::ASK_CHECK_OUT, Some(next.initial())).await?;
                }
            }
        }
        CalendarKind::CheckOut => {
            if turn.session.enter(Stage::OpenRoom) {
                open_first_room(turn).await?;
            }
        }
    }
    Ok(())
}

async fn open_first_room(turn: &mut Turn<'_>) -> Result<(), TransportError> {
    match turn.session.add_room() {
        Ok(room) => {
            let controls = turn.session.adults_control(room);
            turn.ask(texts::ask_adults(room), Some(controls)).await?;
        }
        Err(e) => {
            debug!(code = %e.code(), error = %e, "first room not opened");
            turn.warn(e.to_string());
        }
    }
    Ok(())
}

/// "Edit" under the overall summary: list the fields that can change.
pub async fn summary_menu(turn: &mut Turn<'_>, message_id: MessageId) -> Result<(), TransportError> {
    let session = &turn.session;
    if session.is_finished() || !session.is_summary_surface(message_id) {
        turn.outdated();
        return Ok(());
    }
    let fields = menus::summary_fields(
        session.hotel_count().is_some(),
        session.check_in().is_some(),
        session.check_out().is_some(),
    );
    turn.edit_controls(message_id, Some(fields)).await
}

/// Shows the control of `field` on the summary, with the summary on top.
pub async fn edit_field(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    field: SummaryField,
) -> Result<(), TransportError> {
    let session = &turn.session;
    if session.is_finished() || !session.is_summary_surface(message_id) {
        turn.outdated();
        return Ok(());
    }

    let stored = |slot| session.summary().scalar(slot).and_then(|f| f.keyboard()).cloned();
    let (controls, question) = match field {
        SummaryField::Location => (stored(SummarySlot::Location), texts::CHOOSE_DESTINATION),
        SummaryField::HotelCount => (stored(SummarySlot::HotelCount), texts::ASK_HOTEL_COUNT),
        SummaryField::CheckIn => (
            Some(session.check_in_calendar(turn.today()).initial()),
            texts::ASK_CHECK_IN,
        ),
        SummaryField::CheckOut => (
            session.check_out_calendar().map(|c| c.initial()),
            texts::ASK_CHECK_OUT,
        ),
    };
    let Some(controls) = controls else {
        turn.outdated();
        return Ok(());
    };

    let text = turn.text_over_surface(message_id, question);
    turn.edit_text(message_id, &text, Some(controls)).await
}

/// "Back" on either live summary restores its main controls.
pub async fn back(turn: &mut Turn<'_>, message_id: MessageId) -> Result<(), TransportError> {
    if turn.session.is_finished() {
        turn.outdated();
        return Ok(());
    }
    if turn.session.is_summary_surface(message_id) {
        turn.refresh_summary().await
    } else if turn.session.is_rooms_surface(message_id) {
        turn.show_rooms_menu().await
    } else {
        turn.outdated();
        Ok(())
    }
}

/// Free-text answer to the price range question.
pub async fn price_range(turn: &mut Turn<'_>, text: &str, currency: &str) -> Result<(), TransportError> {
    let range = match parse_price_range(text) {
        Ok(range) => range,
        Err(e) => {
            debug!(error = %e, "price range rejected");
            let retry = format!("{}\n{}", texts::WRONG_FORMAT, texts::ASK_PRICE_RANGE);
            turn.ask(retry, None).await?;
            return Ok(());
        }
    };
    if let Err(e) = turn.session.set_price_range(range) {
        debug!(code = %e.code(), error = %e, "price range out of turn");
        return Ok(());
    }

    turn.send_text(texts::price_range_set(range, currency)).await?;
    turn.ask(texts::ASK_MAX_DISTANCE, None).await?;
    Ok(())
}

/// Free-text answer to the maximum distance question.
pub async fn max_distance(turn: &mut Turn<'_>, text: &str) -> Result<(), TransportError> {
    let distance = match parse_distance(text) {
        Ok(distance) => distance,
        Err(e) => {
            debug!(error = %e, "distance rejected");
            let retry = format!("{}\n{}", texts::WRONG_FORMAT, texts::ASK_MAX_DISTANCE);
            turn.ask(retry, None).await?;
            return Ok(());
        }
    };
    if let Err(e) = turn.session.set_max_distance(distance) {
        debug!(code = %e.code(), error = %e, "distance out of turn");
        return Ok(());
    }

    turn.send_text(texts::max_distance_set(distance)).await?;
    turn.ask(texts::ASK_PHOTOS, Some(menus::photo_question()))
        .await?;
    Ok(())
}
