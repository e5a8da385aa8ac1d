//! History Adapters
//!
//! Implementations of the HistoryLog port.
//!
//! - **InMemoryHistoryLog** - default when no database is configured
//! - **PostgresHistoryLog** - `search_history` table, schema from `migrations/`

mod in_memory_history_log;
mod postgres_history_log;

pub use in_memory_history_log::InMemoryHistoryLog;
pub use postgres_history_log::PostgresHistoryLog;
