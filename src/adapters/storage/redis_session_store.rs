//! Redis-backed session store for multi-process deployments.
//!
//! Each session is a JSON string under `hotel_wizard:session:<user_id>`.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::booking::BookingSession;
use crate::domain::foundation::UserId;
use crate::ports::{SessionStore, SessionStoreError};

const KEY_PREFIX: &str = "hotel_wizard:session:";

/// Redis-backed session store.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Connects to `url` and wraps the multiplexed connection.
    pub async fn connect(url: &str) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| SessionStoreError::BackendError(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| SessionStoreError::BackendError(e.to_string()))?;
        Ok(Self::new(conn))
    }
}

fn session_key(user_id: UserId) -> String {
    format!("{}{}", KEY_PREFIX, user_id)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, user_id: UserId) -> Result<Option<BookingSession>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(session_key(user_id))
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::BackendError(e.to_string()))?;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))
        })
        .transpose()
    }

    async fn put(
        &self,
        user_id: UserId,
        session: &BookingSession,
    ) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(session_key(user_id), json)
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::BackendError(e.to_string()))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(session_key(user_id))
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::BackendError(e.to_string()))
    }
}
