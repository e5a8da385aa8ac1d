//! In-Memory Session Store Adapter
//!
//! Keeps booking sessions in a map. Useful for tests and single-process
//! development runs; everything is lost on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::booking::BookingSession;
use crate::domain::foundation::UserId;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for booking sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<UserId, BookingSession>>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored sessions (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Get the number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: UserId) -> Result<Option<BookingSession>, SessionStoreError> {
        Ok(self.sessions.read().await.get(&user_id).cloned())
    }

    async fn put(
        &self,
        user_id: UserId,
        session: &BookingSession,
    ) -> Result<(), SessionStoreError> {
        self.sessions.write().await.insert(user_id, session.clone());
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(&user_id);
        Ok(())
    }
}
