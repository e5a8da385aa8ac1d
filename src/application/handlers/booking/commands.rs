//! Top-level commands: `/start`, `/help`, `/history` and the three searches.

use tracing::{info, warn};

use super::texts;
use super::turn::Turn;
use crate::domain::booking::{BookingSession, SearchCommand};
use crate::ports::{HistoryLog, OutgoingMessage, TransportError};

pub async fn start(turn: &Turn<'_>) -> Result<(), TransportError> {
    turn.send_text(texts::START).await.map(drop)
}

pub async fn help(turn: &Turn<'_>) -> Result<(), TransportError> {
    turn.send_text(texts::HELP).await.map(drop)
}

/// One message per past search, oldest first.
pub async fn history(turn: &Turn<'_>, log: &dyn HistoryLog) -> Result<(), TransportError> {
    let records = match log.query_by_user(turn.session.user_id()).await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "history query failed");
            turn.send_text(texts::HISTORY_UNAVAILABLE).await?;
            return Ok(());
        }
    };

    if records.is_empty() {
        turn.send_text(texts::HISTORY_EMPTY).await?;
        return Ok(());
    }
    for record in &records {
        turn.send(OutgoingMessage::html(record.render())).await?;
    }
    Ok(())
}

/// Throws the current form away and starts a new one for `command`.
///
/// Controls left on the old form's messages are stripped and input queued
/// by its destination lock is deleted.
pub async fn begin_search(turn: &mut Turn<'_>, command: SearchCommand) -> Result<(), TransportError> {
    let retired = turn.session.retire();
    for message in &retired.controls {
        turn.strip_controls(*message).await?;
    }
    for message in &retired.pending {
        turn.delete(*message).await?;
    }

    turn.session = BookingSession::begin(turn.session.user_id(), turn.chat_id, command);
    info!(command = %command, "booking started");

    turn.ask(texts::ASK_DESTINATION, None).await?;
    Ok(())
}
