//! Session Store Port - Interface for persisting booking sessions.
//!
//! One session per user, written through after every handled event so a
//! conversation survives process restarts.

use async_trait::async_trait;

use crate::domain::booking::BookingSession;
use crate::domain::foundation::UserId;

/// Errors that can occur during session storage operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Port for persisting and loading booking sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session of a user
    ///
    /// # Returns
    /// `None` when the user has no session yet
    async fn get(&self, user_id: UserId) -> Result<Option<BookingSession>, SessionStoreError>;

    /// Save (create or replace) the session of a user
    async fn put(&self, user_id: UserId, session: &BookingSession)
        -> Result<(), SessionStoreError>;

    /// Remove the session of a user. Removing a missing session is not an
    /// error.
    async fn delete(&self, user_id: UserId) -> Result<(), SessionStoreError>;
}
