//! Telegram Bot API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::TelegramConfig;

/// Telegram configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSettings {
    /// Bot token issued by BotFather
    pub bot_token: Secret<String>,

    /// Bot API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// How updates reach the bot
    #[serde(default)]
    pub ingress: IngressMode,

    /// Public HTTPS URL registered with Telegram in webhook mode
    pub webhook_url: Option<String>,

    /// Value Telegram echoes in `X-Telegram-Bot-Api-Secret-Token`
    pub webhook_secret: Option<Secret<String>>,

    /// Long poll wait in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Timeout of ordinary Bot API requests in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Update delivery mode
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngressMode {
    #[default]
    Polling,
    Webhook,
}

impl TelegramSettings {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// Client configuration for the Bot API adapter.
    pub fn client_config(&self) -> TelegramConfig {
        TelegramConfig::new(self.bot_token.expose_secret().clone())
            .with_api_base_url(self.api_base_url.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidUrl("Bot API"));
        }
        if self.request_timeout_secs == 0 || self.poll_timeout_secs > 50 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.ingress == IngressMode::Webhook {
            let url = self
                .webhook_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("TELEGRAM__WEBHOOK_URL"))?;
            if !url.starts_with("https://") {
                return Err(ValidationError::WebhookMustBeHttps);
            }
            if self.webhook_secret.is_none() {
                return Err(ValidationError::MissingRequired("TELEGRAM__WEBHOOK_SECRET"));
            }
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TelegramSettings {
        TelegramSettings {
            bot_token: Secret::new("123:abc".to_string()),
            api_base_url: default_api_base_url(),
            ingress: IngressMode::Polling,
            webhook_url: None,
            webhook_secret: None,
            poll_timeout_secs: default_poll_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    #[test]
    fn test_polling_needs_only_a_token() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let config = TelegramSettings {
            bot_token: Secret::new("  ".to_string()),
            ..settings()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"))
        );
    }

    #[test]
    fn test_webhook_requires_https_url_and_secret() {
        let mut config = TelegramSettings {
            ingress: IngressMode::Webhook,
            ..settings()
        };
        assert!(config.validate().is_err());

        config.webhook_url = Some("http://bot.example.com/telegram/webhook".to_string());
        assert_eq!(config.validate(), Err(ValidationError::WebhookMustBeHttps));

        config.webhook_url = Some("https://bot.example.com/telegram/webhook".to_string());
        assert!(config.validate().is_err());

        config.webhook_secret = Some(Secret::new("s3cret".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_long_poll_wait_is_capped() {
        let config = TelegramSettings {
            poll_timeout_secs: 120,
            ..settings()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let rendered = format!("{:?}", settings());
        assert!(!rendered.contains("123:abc"));
    }

    #[test]
    fn test_client_config_carries_overrides() {
        let config = TelegramSettings {
            api_base_url: "http://localhost:8081".to_string(),
            request_timeout_secs: 3,
            ..settings()
        };
        let client = config.client_config();
        assert_eq!(client.api_base_url, "http://localhost:8081");
        assert_eq!(client.timeout, Duration::from_secs(3));
    }
}
