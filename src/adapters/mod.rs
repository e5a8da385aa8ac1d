//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the booking wizard to external systems:
//! - `telegram` - Bot API transport, long polling, recording test double
//! - `hotels` - Hotels API lookup and search, mock service
//! - `storage` - session stores (in-memory, YAML files, Redis)
//! - `history` - search history logs (in-memory, PostgreSQL)
//! - `http` - webhook ingress and health endpoint
//! - `clock` - system and fixed clocks

pub mod clock;
pub mod history;
pub mod hotels;
pub mod http;
pub mod storage;
pub mod telegram;

pub use clock::{FixedClock, SystemClock};
pub use history::{InMemoryHistoryLog, PostgresHistoryLog};
pub use hotels::{HotelsApiConfig, MockHotelService, RapidApiHotelsClient};
pub use http::{webhook_router, WebhookState};
pub use storage::{FileSessionStore, InMemorySessionStore, RedisSessionStore};
pub use telegram::{RecordingTransport, TelegramClient, TelegramConfig, UpdatePoller};
