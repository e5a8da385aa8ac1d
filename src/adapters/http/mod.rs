//! HTTP adapters - inbound HTTP surface of the bot.

pub mod webhook;

pub use webhook::{webhook_router, WebhookState};
