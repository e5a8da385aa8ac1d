//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Conversation Ports
//!
//! - `ChatTransport` - Sending, editing and deleting chat messages
//! - `SessionStore` - One persisted booking session per user
//!
//! ## Search Ports
//!
//! - `DestinationLookup` - Free text to destination candidates
//! - `HotelSearch` - Hotel offers and photos for finalized criteria
//! - `HistoryLog` - Record of completed searches
//!
//! ## Runtime Ports
//!
//! - `Clock` - Current date and time

mod chat_transport;
mod clock;
mod destination_lookup;
mod history_log;
mod hotel_search;
mod session_store;

pub use chat_transport::{ChatTransport, InboundEvent, OutgoingMessage, TransportError};
pub use clock::Clock;
pub use destination_lookup::{DestinationLookup, LookupError};
pub use history_log::{HistoryError, HistoryLog};
pub use hotel_search::{HotelSearch, SearchError};
pub use session_store::{SessionStore, SessionStoreError};
