//! Telegram Bot API client - implementation of the ChatTransport port.
//!
//! Every method is a JSON POST to `{api_base_url}/bot{token}/{method}`.
//! Two Bot API quirks are folded into the port's vocabulary:
//!
//! - "message is not modified" on an edit is success (the text already
//!   matches)
//! - "message to edit/delete not found" becomes `TransportError::NotFound`

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::dto::{
    AnswerCallbackRequest, ApiResponse, DeleteMessageRequest, EditMessageTextRequest,
    EditReplyMarkupRequest, GetUpdatesRequest, InlineKeyboardMarkup, InputMediaPhoto, Message,
    SendMediaGroupRequest, SendMessageRequest, Update,
};
use crate::domain::controls::InlineKeyboard;
use crate::domain::foundation::{CallbackId, ChatId, MessageId};
use crate::ports::{ChatTransport, OutgoingMessage, TransportError};

const HTML: &str = "HTML";

/// Configuration for the Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    bot_token: Secret<String>,
    pub api_base_url: String,
    /// Timeout of ordinary requests. Long polls add their own wait on top.
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: Secret::new(bot_token.into()),
            api_base_url: "https://api.telegram.org".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    config: TelegramConfig,
    client: Client,
}

impl TelegramClient {
    /// # Errors
    ///
    /// Returns `TransportError::Network` if the HTTP client cannot be built.
    pub fn new(config: TelegramConfig) -> Result<Self, TransportError> {
        // No client-wide timeout: long polls need a longer one than the
        // other calls, so each request sets its own.
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.bot_token.expose_secret(),
            method
        )
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    // reqwest errors embed the URL, which carries the token.
                    TransportError::Network(e.without_url().to_string())
                }
            })?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.without_url().to_string()))?;

        if envelope.ok {
            return envelope
                .result
                .ok_or_else(|| TransportError::Decode(format!("{}: empty result", method)));
        }

        Err(classify(
            envelope.error_code.unwrap_or_default(),
            envelope.description.unwrap_or_default(),
        ))
    }

    /// Calls whose result the wizard does not read.
    async fn call_unit<B: Serialize + ?Sized>(&self, method: &str, body: &B) -> Result<(), TransportError> {
        match self
            .call::<B, serde_json::Value>(method, body, self.config.timeout)
            .await
        {
            Ok(_) => Ok(()),
            Err(TransportError::Api { description, .. })
                if description.contains("message is not modified") =>
            {
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, wait: Duration) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: wait.as_secs(),
            allowed_updates: ["message", "callback_query"],
        };
        self.call("getUpdates", &request, wait + self.config.timeout)
            .await
    }

    /// Removes any registered webhook so `getUpdates` is allowed.
    pub async fn delete_webhook(&self) -> Result<(), TransportError> {
        self.call_unit("deleteWebhook", &serde_json::json!({})).await
    }

    /// Registers `url` as the webhook; Telegram echoes `secret` in the
    /// `X-Telegram-Bot-Api-Secret-Token` header of every delivery.
    pub async fn set_webhook(&self, url: &str, secret: &Secret<String>) -> Result<(), TransportError> {
        let body = serde_json::json!({
            "url": url,
            "secret_token": secret.expose_secret(),
            "allowed_updates": ["message", "callback_query"],
        });
        self.call_unit("setWebhook", &body).await
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: ChatId,
        message: OutgoingMessage,
    ) -> Result<MessageId, TransportError> {
        let request = SendMessageRequest {
            chat_id: chat_id.as_i64(),
            text: &message.text,
            parse_mode: message.html.then_some(HTML),
            reply_markup: message.controls.as_ref().map(InlineKeyboardMarkup::from),
            reply_to_message_id: message.reply_to.map(|m| m.as_i64()),
            disable_web_page_preview: true,
        };
        let sent: Message = self.call("sendMessage", &request, self.config.timeout).await?;
        Ok(MessageId::new(sent.message_id))
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let request = EditMessageTextRequest {
            chat_id: chat_id.as_i64(),
            message_id: message_id.as_i64(),
            text,
            reply_markup: controls.as_ref().map(InlineKeyboardMarkup::from),
        };
        self.call_unit("editMessageText", &request).await
    }

    async fn edit_message_controls(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        controls: Option<InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let request = EditReplyMarkupRequest {
            chat_id: chat_id.as_i64(),
            message_id: message_id.as_i64(),
            reply_markup: controls.as_ref().map(InlineKeyboardMarkup::from),
        };
        self.call_unit("editMessageReplyMarkup", &request).await
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        let request = DeleteMessageRequest {
            chat_id: chat_id.as_i64(),
            message_id: message_id.as_i64(),
        };
        self.call_unit("deleteMessage", &request).await
    }

    async fn answer_callback(
        &self,
        callback_id: &CallbackId,
        text: Option<&str>,
    ) -> Result<(), TransportError> {
        let request = AnswerCallbackRequest {
            callback_query_id: callback_id.as_str(),
            text,
            show_alert: text.is_some(),
        };
        self.call_unit("answerCallbackQuery", &request).await
    }

    async fn send_photo_album(
        &self,
        chat_id: ChatId,
        photo_urls: &[String],
        caption: &str,
    ) -> Result<Vec<MessageId>, TransportError> {
        let media = photo_urls
            .iter()
            .enumerate()
            .map(|(i, url)| InputMediaPhoto {
                kind: "photo",
                media: url,
                caption: (i == 0).then_some(caption),
                parse_mode: (i == 0).then_some(HTML),
            })
            .collect();
        let request = SendMediaGroupRequest {
            chat_id: chat_id.as_i64(),
            media,
        };
        let sent: Vec<Message> = self
            .call("sendMediaGroup", &request, self.config.timeout)
            .await?;
        Ok(sent.into_iter().map(|m| MessageId::new(m.message_id)).collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn classify(code: i64, description: String) -> TransportError {
    let lower = description.to_lowercase();
    if lower.contains("message to edit not found")
        || lower.contains("message to delete not found")
        || lower.contains("message can't be deleted")
        || lower.contains("message can't be edited")
    {
        TransportError::NotFound
    } else {
        TransportError::Api { code, description }
    }
}
