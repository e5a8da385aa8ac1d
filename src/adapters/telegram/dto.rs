//! Bot API wire types.
//!
//! Only the fields the wizard reads are modelled; everything else in an
//! update is ignored by serde.

use serde::{Deserialize, Serialize};

use crate::domain::controls::{InlineButton, InlineKeyboard};
use crate::domain::foundation::{CallbackId, ChatId, MessageId, UserId};
use crate::ports::InboundEvent;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub(super) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl From<&InlineKeyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &InlineKeyboard) -> Self {
        Self {
            inline_keyboard: keyboard.rows().to_vec(),
        }
    }
}

impl From<InlineKeyboardMarkup> for InlineKeyboard {
    fn from(markup: InlineKeyboardMarkup) -> Self {
        InlineKeyboard::new(markup.inline_keyboard)
    }
}

impl Update {
    /// The wizard's view of this update. Updates without a sender, without
    /// text, or of kinds the wizard does not handle yield `None`.
    pub fn into_event(self) -> Option<InboundEvent> {
        if let Some(query) = self.callback_query {
            let message = query.message?;
            return Some(InboundEvent::Callback {
                user_id: UserId::new(query.from.id),
                chat_id: ChatId::new(message.chat.id),
                callback_id: CallbackId::new(query.id),
                message_id: MessageId::new(message.message_id),
                data: query.data.unwrap_or_default(),
                controls: message.reply_markup.map(InlineKeyboard::from),
            });
        }

        let message = self.message?;
        Some(InboundEvent::Text {
            user_id: UserId::new(message.from?.id),
            chat_id: ChatId::new(message.chat.id),
            message_id: MessageId::new(message.message_id),
            text: message.text?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(super) struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    pub disable_web_page_preview: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct EditMessageTextRequest<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(super) struct EditReplyMarkupRequest {
    pub chat_id: i64,
    pub message_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteMessageRequest {
    pub chat_id: i64,
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct AnswerCallbackRequest<'a> {
    pub callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    pub show_alert: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct SendMediaGroupRequest<'a> {
    pub chat_id: i64,
    pub media: Vec<InputMediaPhoto<'a>>,
}

#[derive(Debug, Serialize)]
pub(super) struct InputMediaPhoto<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(super) struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: [&'static str; 2],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_message_becomes_text_event() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "message": {
                "message_id": 55,
                "from": {"id": 7, "is_bot": false, "first_name": "A"},
                "chat": {"id": 7, "type": "private"},
                "date": 0,
                "text": "/lowprice"
            }
        }))
        .unwrap();

        assert_eq!(
            update.into_event(),
            Some(InboundEvent::Text {
                user_id: UserId::new(7),
                chat_id: ChatId::new(7),
                message_id: MessageId::new(55),
                text: "/lowprice".to_string(),
            })
        );
    }

    #[test]
    fn callback_carries_current_keyboard() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 11,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 7},
                "data": "h=3",
                "message": {
                    "message_id": 60,
                    "chat": {"id": 7},
                    "reply_markup": {"inline_keyboard": [[{"text": "3", "callback_data": "h=3"}]]}
                }
            }
        }))
        .unwrap();

        match update.into_event() {
            Some(InboundEvent::Callback { data, controls, message_id, .. }) => {
                assert_eq!(data, "h=3");
                assert_eq!(message_id, MessageId::new(60));
                assert_eq!(controls.map(|k| k.buttons().count()), Some(1));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn stickers_and_edits_are_ignored() {
        let sticker: Update = serde_json::from_value(json!({
            "update_id": 12,
            "message": {"message_id": 61, "from": {"id": 7}, "chat": {"id": 7}}
        }))
        .unwrap();
        assert_eq!(sticker.into_event(), None);

        let edited: Update = serde_json::from_value(json!({
            "update_id": 13,
            "edited_message": {"message_id": 61, "chat": {"id": 7}}
        }))
        .unwrap();
        assert_eq!(edited.into_event(), None);
    }

    #[test]
    fn keyboard_serializes_in_bot_api_shape() {
        let keyboard = InlineKeyboard::new(vec![vec![InlineButton::new("1", "h=1")]]);
        let value = serde_json::to_value(InlineKeyboardMarkup::from(&keyboard)).unwrap();
        assert_eq!(
            value,
            json!({"inline_keyboard": [[{"text": "1", "callback_data": "h=1"}]]})
        );
    }
}
