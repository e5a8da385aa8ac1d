//! Recording chat transport for testing.
//!
//! Keeps an in-memory chat per chat id: every message the bot sends gets the
//! next message id, and [`RecordingTransport::user_message`] allocates ids
//! for user messages from the same sequence, as a private Telegram chat
//! does. Edits and deletions of unknown or deleted messages fail with
//! `TransportError::NotFound`.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::controls::InlineKeyboard;
use crate::domain::foundation::{CallbackId, ChatId, MessageId};
use crate::ports::{ChatTransport, OutgoingMessage, TransportError};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    Bot,
    User,
}

/// A message as currently shown in the chat.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMessage {
    pub chat_id: ChatId,
    pub author: Author,
    pub text: String,
    pub controls: Option<InlineKeyboard>,
    pub photos: Vec<String>,
    pub html: bool,
}

/// An answered button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAnswer {
    pub callback_id: CallbackId,
    pub text: Option<String>,
}

#[derive(Debug, Default)]
struct Chat {
    next_id: i64,
    live: BTreeMap<MessageId, RecordedMessage>,
    deleted: Vec<MessageId>,
    /// Bot messages in send order, including later deleted ones.
    sent: Vec<MessageId>,
}

#[derive(Debug, Default)]
struct Recording {
    chats: BTreeMap<ChatId, Chat>,
    answers: Vec<CallbackAnswer>,
    failure: Option<TransportError>,
}

impl Recording {
    fn chat(&mut self, chat_id: ChatId) -> &mut Chat {
        self.chats.entry(chat_id).or_insert_with(|| Chat {
            next_id: 1,
            ..Chat::default()
        })
    }
}

impl Chat {
    fn allocate(&mut self) -> MessageId {
        let id = MessageId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn live_mut(&mut self, message_id: MessageId) -> Result<&mut RecordedMessage, TransportError> {
        self.live.get_mut(&message_id).ok_or(TransportError::NotFound)
    }
}

/// In-memory ChatTransport that records what a user would see.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ───────────────────────────────────────────────────────────────
    // Scenario helpers
    // ───────────────────────────────────────────────────────────────

    /// Posts a user message and returns its id.
    pub fn user_message(&self, chat_id: ChatId, text: &str) -> MessageId {
        let mut rec = self.lock();
        let chat = rec.chat(chat_id);
        let id = chat.allocate();
        chat.live.insert(
            id,
            RecordedMessage {
                chat_id,
                author: Author::User,
                text: text.to_string(),
                controls: None,
                photos: Vec::new(),
                html: false,
            },
        );
        id
    }

    /// Makes every following call fail with `error` until cleared.
    pub fn fail_with(&self, error: Option<TransportError>) {
        self.lock().failure = error;
    }

    // ───────────────────────────────────────────────────────────────
    // Inspection
    // ───────────────────────────────────────────────────────────────

    /// A live (not deleted) message.
    pub fn message(&self, chat_id: ChatId, message_id: MessageId) -> Option<RecordedMessage> {
        self.lock()
            .chats
            .get(&chat_id)
            .and_then(|c| c.live.get(&message_id).cloned())
    }

    /// Live messages in id order.
    pub fn live_messages(&self, chat_id: ChatId) -> Vec<(MessageId, RecordedMessage)> {
        self.lock()
            .chats
            .get(&chat_id)
            .map(|c| c.live.iter().map(|(id, m)| (*id, m.clone())).collect())
            .unwrap_or_default()
    }

    /// Ids of bot messages in send order.
    pub fn sent(&self, chat_id: ChatId) -> Vec<MessageId> {
        self.lock()
            .chats
            .get(&chat_id)
            .map(|c| c.sent.clone())
            .unwrap_or_default()
    }

    /// The most recently sent bot message that is still live.
    pub fn last_sent(&self, chat_id: ChatId) -> Option<(MessageId, RecordedMessage)> {
        let rec = self.lock();
        let chat = rec.chats.get(&chat_id)?;
        chat.sent
            .iter()
            .rev()
            .find_map(|id| chat.live.get(id).map(|m| (*id, m.clone())))
    }

    pub fn is_deleted(&self, chat_id: ChatId, message_id: MessageId) -> bool {
        self.lock()
            .chats
            .get(&chat_id)
            .map(|c| c.deleted.contains(&message_id))
            .unwrap_or(false)
    }

    pub fn callback_answers(&self) -> Vec<CallbackAnswer> {
        self.lock().answers.clone()
    }

    fn check_failure(rec: &Recording) -> Result<(), TransportError> {
        match &rec.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        message: OutgoingMessage,
    ) -> Result<MessageId, TransportError> {
        let mut rec = self.lock();
        Self::check_failure(&rec)?;
        let chat = rec.chat(chat_id);
        let id = chat.allocate();
        chat.live.insert(
            id,
            RecordedMessage {
                chat_id,
                author: Author::Bot,
                text: message.text,
                controls: message.controls,
                photos: Vec::new(),
                html: message.html,
            },
        );
        chat.sent.push(id);
        Ok(id)
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let mut rec = self.lock();
        Self::check_failure(&rec)?;
        let message = rec.chat(chat_id).live_mut(message_id)?;
        message.text = text.to_string();
        message.controls = controls;
        Ok(())
    }

    async fn edit_message_controls(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let mut rec = self.lock();
        Self::check_failure(&rec)?;
        rec.chat(chat_id).live_mut(message_id)?.controls = controls;
        Ok(())
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        let mut rec = self.lock();
        Self::check_failure(&rec)?;
        let chat = rec.chat(chat_id);
        chat.live.remove(&message_id).ok_or(TransportError::NotFound)?;
        chat.deleted.push(message_id);
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &CallbackId,
        text: Option<&str>,
    ) -> Result<(), TransportError> {
        let mut rec = self.lock();
        rec.answers.push(CallbackAnswer {
            callback_id: callback_id.clone(),
            text: text.map(str::to_string),
        });
        Ok(())
    }

    async fn send_photo_album(
        &self,
        chat_id: ChatId,
        photo_urls: &[String],
        caption: &str,
    ) -> Result<Vec<MessageId>, TransportError> {
        let mut rec = self.lock();
        Self::check_failure(&rec)?;
        let chat = rec.chat(chat_id);
        let mut ids = Vec::with_capacity(photo_urls.len());
        for (i, url) in photo_urls.iter().enumerate() {
            let id = chat.allocate();
            chat.live.insert(
                id,
                RecordedMessage {
                    chat_id,
                    author: Author::Bot,
                    text: if i == 0 { caption.to_string() } else { String::new() },
                    controls: None,
                    photos: vec![url.clone()],
                    html: true,
                },
            );
            chat.sent.push(id);
            ids.push(id);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatId = ChatId::new(7);

    #[tokio::test]
    async fn user_and_bot_share_id_sequence() {
        let transport = RecordingTransport::new();
        let user = transport.user_message(CHAT, "/lowprice");
        let bot = transport
            .send_message(CHAT, OutgoingMessage::text("Where to?"))
            .await
            .unwrap();
        assert_eq!(bot.as_i64(), user.as_i64() + 1);
        assert_eq!(transport.sent(CHAT), vec![bot]);
    }

    #[tokio::test]
    async fn deleted_messages_are_not_found() {
        let transport = RecordingTransport::new();
        let id = transport
            .send_message(CHAT, OutgoingMessage::text("x"))
            .await
            .unwrap();
        transport.delete_message(CHAT, id).await.unwrap();

        assert!(transport.is_deleted(CHAT, id));
        assert_eq!(transport.delete_message(CHAT, id).await, Err(TransportError::NotFound));
        assert_eq!(
            transport.edit_message_text(CHAT, id, "y", None).await,
            Err(TransportError::NotFound)
        );
    }

    #[tokio::test]
    async fn edits_replace_text_and_controls() {
        let transport = RecordingTransport::new();
        let id = transport
            .send_message(
                CHAT,
                OutgoingMessage::text("a").with_controls(InlineKeyboard::default()),
            )
            .await
            .unwrap();
        transport.edit_message_text(CHAT, id, "b", None).await.unwrap();

        let message = transport.message(CHAT, id).unwrap();
        assert_eq!(message.text, "b");
        assert_eq!(message.controls, None);
    }
}
