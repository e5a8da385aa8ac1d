//! Turn - everything one inbound event works with.
//!
//! A turn owns the loaded session until the dispatcher persists it, talks to
//! the chat through the transport and collects the short notice that is
//! shown when a button press is acknowledged.

use chrono::NaiveDate;
use tracing::debug;

use super::texts;
use crate::domain::booking::BookingSession;
use crate::domain::controls::{menus, InlineKeyboard};
use crate::domain::foundation::{ChatId, MessageId, Timestamp};
use crate::ports::{ChatTransport, OutgoingMessage, TransportError};

pub struct Turn<'a> {
    transport: &'a dyn ChatTransport,
    pub session: BookingSession,
    pub chat_id: ChatId,
    today: NaiveDate,
    notice: Option<String>,
}

impl<'a> Turn<'a> {
    pub fn new(transport: &'a dyn ChatTransport, session: BookingSession, chat_id: ChatId) -> Self {
        Self {
            transport,
            session,
            chat_id,
            today: Timestamp::now().date(),
            notice: None,
        }
    }

    /// Sets the date calendars count from.
    pub fn at(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Hands the session back for persisting, with the pending notice.
    pub fn finish(self) -> (BookingSession, Option<String>) {
        (self.session, self.notice)
    }

    pub fn transport(&self) -> &'a dyn ChatTransport {
        self.transport
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notices
    // ─────────────────────────────────────────────────────────────────────────

    /// Short text shown with the callback acknowledgement.
    pub fn warn(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
    }

    pub fn outdated(&mut self) {
        self.warn(texts::OUTDATED);
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn send(&self, message: OutgoingMessage) -> Result<MessageId, TransportError> {
        self.transport.send_message(self.chat_id, message).await
    }

    pub async fn send_text(&self, text: impl Into<String>) -> Result<MessageId, TransportError> {
        self.send(OutgoingMessage::text(text)).await
    }

    /// Sends a question and records it as the current prompt.
    pub async fn ask(
        &mut self,
        text: impl Into<String>,
        controls: Option<InlineKeyboard>,
    ) -> Result<MessageId, TransportError> {
        let mut message = OutgoingMessage::text(text);
        message.controls = controls;
        let id = self.send(message).await?;
        self.session.set_current_prompt(Some(id));
        Ok(id)
    }

    /// Edits a message; a message that is gone is skipped.
    pub async fn edit_text(
        &self,
        message_id: MessageId,
        text: &str,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let result = self
            .transport
            .edit_message_text(self.chat_id, message_id, text, controls)
            .await;
        tolerate_missing(result, message_id)
    }

    pub async fn edit_controls(
        &self,
        message_id: MessageId,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let result = self
            .transport
            .edit_message_controls(self.chat_id, message_id, controls)
            .await;
        tolerate_missing(result, message_id)
    }

    pub async fn delete(&self, message_id: MessageId) -> Result<(), TransportError> {
        let result = self.transport.delete_message(self.chat_id, message_id).await;
        tolerate_missing(result, message_id)
    }

    /// Deletes `message_id` unless it is one of the live summaries.
    pub async fn delete_prompt(&self, message_id: MessageId) -> Result<(), TransportError> {
        if self.session.is_surface(message_id) {
            return Ok(());
        }
        self.delete(message_id).await
    }

    /// Removes the keyboard of `message_id`. When the message is gone the one
    /// sent right before it is tried instead.
    pub async fn strip_controls(&self, message_id: MessageId) -> Result<(), TransportError> {
        match self
            .transport
            .edit_message_controls(self.chat_id, message_id, None)
            .await
        {
            Err(e) if e.is_not_found() => {
                let fallback = message_id.previous();
                debug!(message = %message_id, fallback = %fallback, "message gone, trying previous");
                self.edit_controls(fallback, None).await
            }
            other => other,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Live summaries
    // ─────────────────────────────────────────────────────────────────────────

    /// Text for `message_id` with `question` underneath; the summary text is
    /// kept on top when the message is the overall summary.
    pub fn text_over_surface(&self, message_id: MessageId, question: &str) -> String {
        if self.session.is_summary_surface(message_id) {
            texts::over_summary(&self.session.overall_text(), question)
        } else {
            question.to_string()
        }
    }

    /// Re-renders the overall summary with its "Edit" button.
    pub async fn refresh_summary(&self) -> Result<(), TransportError> {
        self.refresh_summary_with(Some(menus::summary_edit())).await
    }

    pub async fn refresh_summary_with(
        &self,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        match self.session.surfaces().summary {
            Some(surface) => {
                self.edit_text(surface, &self.session.overall_text(), controls)
                    .await
            }
            None => Ok(()),
        }
    }

    /// Re-renders the rooms summary with `controls`.
    pub async fn refresh_rooms(&self, controls: Option<InlineKeyboard>) -> Result<(), TransportError> {
        match self.session.surfaces().rooms {
            Some(surface) => self.edit_text(surface, &self.session.rooms_text(), controls).await,
            None => Ok(()),
        }
    }

    /// Rooms summary with the rooms menu underneath.
    pub async fn show_rooms_menu(&self) -> Result<(), TransportError> {
        let total = self.session.rooms().len();
        self.refresh_rooms(Some(menus::rooms_menu(total))).await
    }
}

fn tolerate_missing(result: Result<(), TransportError>, message_id: MessageId) -> Result<(), TransportError> {
    match result {
        Err(e) if e.is_not_found() => {
            debug!(message = %message_id, "message already gone");
            Ok(())
        }
        other => other,
    }
}
