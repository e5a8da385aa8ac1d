//! Chat Transport Port - Interface for the messaging platform.
//!
//! The booking flow talks to users only through this port: sending prompts,
//! editing the live summaries, deleting stale prompts and acknowledging
//! button presses. Inbound traffic arrives as [`InboundEvent`]s produced by
//! the transport's ingress (long polling or webhook).

use async_trait::async_trait;

use crate::domain::controls::InlineKeyboard;
use crate::domain::foundation::{CallbackId, ChatId, MessageId, UserId};

/// Errors from the messaging platform.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The message was already deleted or never existed.
    #[error("message not found")]
    NotFound,

    /// The platform rejected the request.
    #[error("api error {code}: {description}")]
    Api { code: i64, description: String },

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// The response could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl TransportError {
    /// True when the message is gone. Callers treat this as non-fatal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::NotFound)
    }
}

/// A message to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub controls: Option<InlineKeyboard>,
    /// Message to quote.
    pub reply_to: Option<MessageId>,
    /// Parse `text` as HTML.
    pub html: bool,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: true,
            ..Self::default()
        }
    }

    pub fn with_controls(mut self, controls: InlineKeyboard) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn replying_to(mut self, message: MessageId) -> Self {
        self.reply_to = Some(message);
        self
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A text message.
    Text {
        user_id: UserId,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    /// A button press on one of the bot's messages.
    Callback {
        user_id: UserId,
        chat_id: ChatId,
        callback_id: CallbackId,
        /// The message carrying the pressed button.
        message_id: MessageId,
        data: String,
        /// Keyboard attached to that message when it was pressed.
        controls: Option<InlineKeyboard>,
    },
}

impl InboundEvent {
    pub fn user_id(&self) -> UserId {
        match self {
            InboundEvent::Text { user_id, .. } | InboundEvent::Callback { user_id, .. } => {
                *user_id
            }
        }
    }

    pub fn chat_id(&self) -> ChatId {
        match self {
            InboundEvent::Text { chat_id, .. } | InboundEvent::Callback { chat_id, .. } => {
                *chat_id
            }
        }
    }
}

/// Port for the messaging platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a message and returns its id.
    async fn send_message(
        &self,
        chat_id: ChatId,
        message: OutgoingMessage,
    ) -> Result<MessageId, TransportError>;

    /// Replaces text and controls of a message. `None` controls removes the
    /// keyboard.
    ///
    /// # Errors
    ///
    /// `NotFound` if the message is gone.
    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError>;

    /// Replaces only the controls. `None` removes the keyboard.
    async fn edit_message_controls(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError>;

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError>;

    /// Acknowledges a button press, optionally with a short notice.
    async fn answer_callback(
        &self,
        callback_id: &CallbackId,
        text: Option<&str>,
    ) -> Result<(), TransportError>;

    /// Sends photos as one album with `caption` on the first photo.
    async fn send_photo_album(
        &self,
        chat_id: ChatId,
        photo_urls: &[String],
        caption: &str,
    ) -> Result<Vec<MessageId>, TransportError>;
}
