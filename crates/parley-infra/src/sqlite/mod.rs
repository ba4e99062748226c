//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod pool;
pub mod session;
pub mod stats;

use chrono::{DateTime, NaiveDate, Utc};
use parley_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Query(format!("invalid date '{s}': {e}")))
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Map a sqlx error, distinguishing an unreachable store from a failed query.
pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}
