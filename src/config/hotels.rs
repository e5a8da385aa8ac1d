//! Hotels API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::HotelsApiConfig;

/// RapidAPI hotels configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HotelsConfig {
    /// RapidAPI key
    pub api_key: Secret<String>,

    #[serde(default = "default_api_host")]
    pub api_host: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_locale")]
    pub locale: String,

    /// ISO 4217 code prices are quoted in
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Offers requested per search
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl HotelsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Client configuration for the hotels adapter.
    pub fn client_config(&self) -> HotelsApiConfig {
        HotelsApiConfig::new(self.api_key.expose_secret().clone())
            .with_api_host(self.api_host.clone())
            .with_base_url(self.base_url.clone())
            .with_locale(self.locale.clone())
            .with_currency(self.currency.clone())
            .with_timeout(self.timeout())
            .with_page_size(self.page_size)
    }

    /// Validate hotels configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("HOTELS__API_KEY"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("hotels API"));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.page_size == 0 || self.page_size > 200 {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(())
    }
}

fn default_api_host() -> String {
    "hotels4.p.rapidapi.com".to_string()
}

fn default_base_url() -> String {
    "https://hotels4.p.rapidapi.com".to_string()
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_page_size() -> u32 {
    25
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HotelsConfig {
        HotelsConfig {
            api_key: Secret::new("rapid-key".to_string()),
            api_host: default_api_host(),
            base_url: default_base_url(),
            locale: default_locale(),
            currency: default_currency(),
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_lowercase_currency_is_rejected() {
        let config = HotelsConfig {
            currency: "usd".to_string(),
            ..config()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCurrency));
    }

    #[test]
    fn test_page_size_bounds() {
        for page_size in [0, 201] {
            let config = HotelsConfig {
                page_size,
                ..config()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidPageSize));
        }
    }

    #[test]
    fn test_client_config_carries_settings() {
        let config = HotelsConfig {
            locale: "ru_RU".to_string(),
            currency: "EUR".to_string(),
            page_size: 10,
            ..config()
        };
        let client = config.client_config();
        assert_eq!(client.locale, "ru_RU");
        assert_eq!(client.currency, "EUR");
        assert_eq!(client.page_size, 10);
        assert_eq!(client.timeout, Duration::from_secs(15));
    }
}
