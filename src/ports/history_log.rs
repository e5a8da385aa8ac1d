//! History Log Port - persistent record of completed searches.

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::search::HistoryRecord;

/// Errors from the history log.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Failed to decode history record: {0}")]
    DecodeFailed(String),
}

/// Port for the search history.
#[async_trait]
pub trait HistoryLog: Send + Sync {
    async fn append(&self, record: &HistoryRecord) -> Result<(), HistoryError>;

    /// Records of `user_id`, oldest first.
    async fn query_by_user(&self, user_id: UserId) -> Result<Vec<HistoryRecord>, HistoryError>;
}
