//! SQLite session repository implementation.
//!
//! Implements `SessionRepository` from `parley-core` using sqlx with split
//! read/write pools. Each session is one row whose message list is stored as
//! a JSON array and returned verbatim.

use chrono::{DateTime, Utc};
use parley_core::repository::session::SessionRepository;
use parley_types::error::RepositoryError;
use parley_types::session::{Message, Session};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `SessionRepository`.
#[derive(Clone)]
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    id: String,
    messages: String,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            messages: row.try_get("messages")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<Session, RepositoryError> {
        let messages: Vec<Message> = serde_json::from_str(&self.messages).map_err(|e| {
            RepositoryError::Query(format!("invalid messages for session {}: {e}", self.id))
        })?;

        Ok(Session {
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            id: self.id,
            messages,
        })
    }
}

fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> Result<Session, RepositoryError> {
    SessionRow::from_row(row).map_err(query_error)?.into_session()
}

fn encode_messages(messages: &[Message]) -> Result<String, RepositoryError> {
    serde_json::to_string(messages)
        .map_err(|e| RepositoryError::Query(format!("failed to serialize messages: {e}")))
}

// ---------------------------------------------------------------------------
// SessionRepository implementation
// ---------------------------------------------------------------------------

impl SessionRepository for SqliteSessionRepository {
    async fn get(&self, id: &str) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn list(&self) -> Result<Vec<Session>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM sessions ORDER BY created_at ASC, rowid ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(row_to_session).collect()
    }

    async fn create(&self, session: &Session) -> Result<Session, RepositoryError> {
        let messages = encode_messages(&session.messages)?;

        sqlx::query(
            "INSERT INTO sessions (id, messages, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&messages)
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("UNIQUE") {
                    return RepositoryError::Conflict(format!(
                        "session {} already exists",
                        session.id
                    ));
                }
            }
            query_error(e)
        })?;

        Ok(session.clone())
    }

    async fn replace_messages(
        &self,
        id: &str,
        messages: &[Message],
    ) -> Result<Option<Session>, RepositoryError> {
        let encoded = encode_messages(messages)?;
        let now = format_datetime(&Utc::now());

        // Single statement: the old list is discarded, never merged.
        let row = sqlx::query(
            "UPDATE sessions SET messages = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(&encoded)
        .bind(&now)
        .bind(id)
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn delete(&self, id: &str) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok((result.rows_affected() > 0).then(Utc::now))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM sessions")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        let count: i64 = row.try_get("cnt").map_err(query_error)?;
        Ok(count as u64)
    }
}
