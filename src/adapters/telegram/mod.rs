//! Telegram Adapters
//!
//! - **TelegramClient** - Bot API implementation of ChatTransport
//! - **UpdatePoller** - long-polling ingress
//! - **RecordingTransport** - in-memory chat for tests

mod client;
mod dto;
mod poller;
mod recording_transport;

pub use client::{TelegramClient, TelegramConfig};
pub use dto::Update;
pub use poller::UpdatePoller;
pub use recording_transport::{Author, CallbackAnswer, RecordedMessage, RecordingTransport};
