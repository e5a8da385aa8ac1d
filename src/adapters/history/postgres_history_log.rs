//! PostgreSQL implementation of HistoryLog.
//!
//! One row per completed search in `search_history`; the shown hotels are a
//! JSONB array of `{id, name}` objects.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;

use crate::domain::booking::SearchCommand;
use crate::domain::foundation::{HistoryRecordId, Timestamp, UserId};
use crate::domain::search::{HistoryRecord, HotelRef};
use crate::ports::{HistoryError, HistoryLog};

/// PostgreSQL implementation of HistoryLog.
#[derive(Clone)]
pub struct PostgresHistoryLog {
    pool: PgPool,
}

impl PostgresHistoryLog {
    /// Creates a new PostgresHistoryLog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, HistoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| HistoryError::DatabaseError(format!("Failed to connect: {}", e)))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| HistoryError::DatabaseError(format!("Failed to migrate: {}", e)))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl HistoryLog for PostgresHistoryLog {
    async fn append(&self, record: &HistoryRecord) -> Result<(), HistoryError> {
        sqlx::query(
            r#"
            INSERT INTO search_history (
                id, user_id, created_at, command, location, hotels
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.as_i64())
        .bind(record.created_at.as_datetime())
        .bind(record.command.as_str())
        .bind(&record.location)
        .bind(Json(&record.hotels))
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::DatabaseError(format!("Failed to insert history: {}", e)))?;

        Ok(())
    }

    async fn query_by_user(&self, user_id: UserId) -> Result<Vec<HistoryRecord>, HistoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, created_at, command, location, hotels
            FROM search_history
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::DatabaseError(format!("Failed to fetch history: {}", e)))?;

        rows.into_iter().map(row_to_record).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, HistoryError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| HistoryError::DecodeFailed(format!("Failed to get {}: {}", name, e)))
}

fn row_to_record(row: PgRow) -> Result<HistoryRecord, HistoryError> {
    let id: uuid::Uuid = column(&row, "id")?;
    let user_id: i64 = column(&row, "user_id")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;
    let command: String = column(&row, "command")?;
    let location: String = column(&row, "location")?;
    let Json(hotels): Json<Vec<HotelRef>> = column(&row, "hotels")?;

    let command = SearchCommand::parse(&command)
        .ok_or_else(|| HistoryError::DecodeFailed(format!("Invalid command: {}", command)))?;

    Ok(HistoryRecord {
        id: HistoryRecordId::from_uuid(id),
        user_id: UserId::new(user_id),
        created_at: Timestamp::from_datetime(created_at),
        command,
        location,
        hotels,
    })
}
