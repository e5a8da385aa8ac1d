//! Destination stage: free-text lookup, disambiguation and the lock that
//! holds stray input while a list is open.

use tracing::{debug, info, warn};

use super::texts;
use super::turn::Turn;
use crate::domain::booking::Stage;
use crate::domain::controls::{menus, InlineKeyboard};
use crate::domain::foundation::MessageId;
use crate::domain::search::DestinationCandidate;
use crate::ports::{DestinationLookup, OutgoingMessage, TransportError};

/// Looks `query` up and shows the candidates. Nothing found, or a failing
/// lookup, asks for the destination again.
pub async fn submit_query(
    turn: &mut Turn<'_>,
    lookup: &dyn DestinationLookup,
    query: &str,
) -> Result<(), TransportError> {
    let candidates = match lookup.lookup(query.trim()).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(error = %e, "destination lookup failed");
            Vec::new()
        }
    };

    if candidates.is_empty() {
        turn.session.destination_lock_mut().lookup_failed();
        turn.ask(texts::DESTINATION_NOT_FOUND, None).await?;
        return Ok(());
    }

    debug!(count = candidates.len(), "destination candidates");
    let controls = menus::destinations(&candidates);
    let prompt = turn.ask(texts::CHOOSE_DESTINATION, Some(controls)).await?;
    turn.session.destination_lock_mut().hold(prompt, candidates);
    Ok(())
}

/// Free text arriving while a disambiguation list is open: point back to the
/// list and queue both messages for deletion.
pub async fn intercept(turn: &mut Turn<'_>, message_id: MessageId) -> Result<(), TransportError> {
    let mut pointer = OutgoingMessage::text(texts::FINISH_DESTINATION_FIRST);
    pointer.reply_to = turn.session.destination_lock().prompt();
    let pointer = turn.send(pointer).await?;

    let lock = turn.session.destination_lock_mut();
    lock.queue(message_id);
    lock.queue(pointer);
    debug!(queued = lock.pending().len(), "input held by destination lock");
    Ok(())
}

/// A candidate was chosen on the open list or on the summary.
pub async fn select(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    destination_id: &str,
    payload: &str,
    controls: Option<InlineKeyboard>,
) -> Result<(), TransportError> {
    let session = &turn.session;
    let on_list = session.destination_lock().prompt() == Some(message_id);
    if session.is_finished() || !(on_list || session.is_summary_surface(message_id)) {
        turn.outdated();
        return Ok(());
    }

    let controls = controls.unwrap_or_default();
    let name = session
        .destination_lock()
        .candidate_name(destination_id)
        .or_else(|| controls.label_for(payload))
        .map(str::to_string);
    let Some(name) = name else {
        turn.outdated();
        return Ok(());
    };

    let marked = controls.marked(&name);
    let candidate = DestinationCandidate::new(destination_id, name);
    let pending = match turn.session.select_destination(candidate, marked) {
        Ok(pending) => pending,
        Err(e) => {
            debug!(error = %e, "destination choice rejected");
            turn.outdated();
            return Ok(());
        }
    };
    info!(destination = destination_id, "destination selected");

    let surface = turn.session.claim_summary_surface(message_id);
    turn.refresh_summary().await?;
    if surface != message_id {
        turn.delete(message_id).await?;
    }
    for queued in pending {
        turn.delete(queued).await?;
    }

    if turn.session.enter(Stage::ChooseHotelCount) {
        turn.ask(texts::ASK_HOTEL_COUNT, Some(menus::hotel_count()))
            .await?;
    }
    Ok(())
}
