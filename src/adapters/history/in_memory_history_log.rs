//! In-Memory History Log Adapter
//!
//! Keeps search history in a vector. Used when no database is configured and
//! in tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::search::HistoryRecord;
use crate::ports::{HistoryError, HistoryLog};

/// In-memory search history
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryLog {
    records: Arc<RwLock<Vec<HistoryRecord>>>,
}

impl InMemoryHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored records
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl HistoryLog for InMemoryHistoryLog {
    async fn append(&self, record: &HistoryRecord) -> Result<(), HistoryError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn query_by_user(&self, user_id: UserId) -> Result<Vec<HistoryRecord>, HistoryError> {
        let mut records: Vec<HistoryRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }
}
