//! BookingDispatcher - routes one inbound event to its stage handler.
//!
//! Every event runs the same pipeline under the user's lock:
//!
//! 1. load the session, or start an empty one
//! 2. route the event to a handler
//! 3. acknowledge the button press, with the handler's notice
//! 4. persist the session, or drop it when its room indices disagree

use std::sync::Arc;

use tracing::{debug, error, warn, Instrument};

use super::commands;
use super::criteria;
use super::destination;
use super::errors::DispatchError;
use super::finish;
use super::rooms;
use super::search::SearchOrchestrator;
use super::session_locks::SessionLocks;
use super::texts;
use super::turn::Turn;
use crate::domain::booking::{is_greeting, BookingSession, TextPrompt, TopLevelCommand};
use crate::domain::controls::{CallbackAction, InlineKeyboard};
use crate::domain::foundation::{MessageId, UserId};
use crate::ports::{
    ChatTransport, Clock, DestinationLookup, HistoryLog, InboundEvent, SessionStore,
    SessionStoreError, TransportError,
};

/// Handles inbound chat events for every user.
pub struct BookingDispatcher {
    transport: Arc<dyn ChatTransport>,
    store: Arc<dyn SessionStore>,
    lookup: Arc<dyn DestinationLookup>,
    history: Arc<dyn HistoryLog>,
    clock: Arc<dyn Clock>,
    orchestrator: SearchOrchestrator,
    locks: SessionLocks,
}

impl BookingDispatcher {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        store: Arc<dyn SessionStore>,
        lookup: Arc<dyn DestinationLookup>,
        history: Arc<dyn HistoryLog>,
        clock: Arc<dyn Clock>,
        orchestrator: SearchOrchestrator,
    ) -> Self {
        Self {
            transport,
            store,
            lookup,
            history,
            clock,
            orchestrator,
            locks: SessionLocks::new(),
        }
    }

    pub async fn dispatch(&self, event: InboundEvent) -> Result<(), DispatchError> {
        let span = tracing::info_span!("dispatch", user = %event.user_id());
        self.dispatch_locked(event).instrument(span).await
    }

    async fn dispatch_locked(&self, event: InboundEvent) -> Result<(), DispatchError> {
        let user_id = event.user_id();
        let chat_id = event.chat_id();
        let _guard = self.locks.acquire(user_id).await;

        // 1. Load
        let session = self
            .load(user_id)
            .await?
            .unwrap_or_else(|| BookingSession::new(user_id, chat_id));
        let mut turn =
            Turn::new(self.transport.as_ref(), session, chat_id).at(self.clock.today());

        // 2. Route
        let (handled, callback_id) = match event {
            InboundEvent::Text {
                message_id, text, ..
            } => (self.on_text(&mut turn, message_id, &text).await, None),
            InboundEvent::Callback {
                callback_id,
                message_id,
                data,
                controls,
                ..
            } => (
                self.on_callback(&mut turn, message_id, &data, controls).await,
                Some(callback_id),
            ),
        };
        let (session, notice) = turn.finish();

        // 3. Acknowledge
        if let Some(callback_id) = callback_id {
            if let Err(e) = self
                .transport
                .answer_callback(&callback_id, notice.as_deref())
                .await
            {
                warn!(error = %e, "callback not acknowledged");
            }
        }

        // 4. Persist, even when the handler failed half way
        self.persist(user_id, &session).await?;
        handled.map_err(DispatchError::from)
    }

    async fn load(&self, user_id: UserId) -> Result<Option<BookingSession>, DispatchError> {
        match self.store.get(user_id).await {
            Ok(session) => Ok(session),
            Err(SessionStoreError::DeserializationFailed(reason)) => {
                warn!(%reason, "stored session unreadable, starting over");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, user_id: UserId, session: &BookingSession) -> Result<(), DispatchError> {
        match session.check_consistency() {
            Ok(()) => self.store.put(user_id, session).await?,
            Err(e) => {
                error!(error = %e, "session inconsistent, resetting");
                self.store.delete(user_id).await?;
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text messages
    // ─────────────────────────────────────────────────────────────────────────

    async fn on_text(
        &self,
        turn: &mut Turn<'_>,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        if let Some(command) = TopLevelCommand::parse(text) {
            debug!(?command, "command");
            return match command {
                TopLevelCommand::Start => commands::start(turn).await,
                TopLevelCommand::Help => commands::help(turn).await,
                TopLevelCommand::History => commands::history(turn, self.history.as_ref()).await,
                TopLevelCommand::Search(search) => commands::begin_search(turn, search).await,
            };
        }
        if is_greeting(text) {
            return commands::start(turn).await;
        }
        if turn.session.destination_lock().is_held() {
            return destination::intercept(turn, message_id).await;
        }

        match turn.session.awaiting() {
            Some(TextPrompt::Destination) => {
                destination::submit_query(turn, self.lookup.as_ref(), text).await
            }
            Some(TextPrompt::PriceRange) => {
                criteria::price_range(turn, text, self.orchestrator.currency()).await
            }
            Some(TextPrompt::MaxDistance) => criteria::max_distance(turn, text).await,
            None => turn.send_text(texts::UNKNOWN_COMMAND).await.map(drop),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Button presses
    // ─────────────────────────────────────────────────────────────────────────

    async fn on_callback(
        &self,
        turn: &mut Turn<'_>,
        message_id: MessageId,
        data: &str,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let Some(action) = CallbackAction::parse(data) else {
            debug!(data, "unknown callback payload");
            turn.outdated();
            return Ok(());
        };
        debug!(?action, message = %message_id, "callback");

        match action {
            CallbackAction::SelectDestination(id) => {
                destination::select(turn, message_id, &id, data, controls).await
            }
            CallbackAction::HotelCount(count) => {
                criteria::hotel_count(turn, message_id, count, controls).await
            }
            CallbackAction::Calendar { kind, step } => {
                criteria::calendar(turn, message_id, kind, step, data).await
            }
            CallbackAction::SummaryMenu => criteria::summary_menu(turn, message_id).await,
            CallbackAction::EditField(field) => criteria::edit_field(turn, message_id, field).await,
            CallbackAction::Back => criteria::back(turn, message_id).await,
            CallbackAction::Adults { count, room } => {
                rooms::adults(turn, message_id, count, room, controls).await
            }
            CallbackAction::WantChildren { room } => {
                rooms::want_children(turn, message_id, room).await
            }
            CallbackAction::ChildAge { age, room } => {
                rooms::child_age(turn, message_id, age, room).await
            }
            CallbackAction::NoMoreChildren { room } => {
                rooms::no_more_children(turn, message_id, room).await
            }
            CallbackAction::RoomsEditMenu => rooms::edit_menu(turn, message_id).await,
            CallbackAction::AddRoom => rooms::add_room(turn, message_id).await,
            CallbackAction::EditRoom(room) => rooms::edit_room(turn, message_id, room).await,
            CallbackAction::DeleteMenu => rooms::delete_menu(turn, message_id).await,
            CallbackAction::DeleteRoom(room) => rooms::delete_room(turn, message_id, room).await,
            CallbackAction::Finish => finish::finish(turn, message_id).await,
            CallbackAction::PhotosWanted => finish::photos_wanted(turn, message_id).await,
            CallbackAction::NoPhotos => {
                finish::photos_chosen(turn, message_id, None, &self.orchestrator)
                    .await
                    .map(drop)
            }
            CallbackAction::PhotoCount(count) => {
                finish::photos_chosen(turn, message_id, Some(count), &self.orchestrator)
                    .await
                    .map(drop)
            }
            CallbackAction::Ignore => Ok(()),
        }
    }
}
