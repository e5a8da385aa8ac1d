//! Storage Adapters
//!
//! Implementations of the SessionStore port for persisting booking sessions.
//!
//! ## Available Adapters
//!
//! - **FileSessionStore** - One YAML file per user on disk
//! - **InMemorySessionStore** - A map in memory (testing/development)
//! - **RedisSessionStore** - JSON values in Redis (multi-process deployments)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSessionStore, InMemorySessionStore};
//!
//! // Production: file-based storage
//! let store = FileSessionStore::new("./data/sessions");
//!
//! // Testing: in-memory storage
//! let store = InMemorySessionStore::new();
//! ```

mod file_session_store;
mod in_memory_session_store;
mod redis_session_store;

pub use file_session_store::FileSessionStore;
pub use in_memory_session_store::InMemorySessionStore;
pub use redis_session_store::RedisSessionStore;
