use chrono::NaiveDate;
use thiserror::Error;

/// Errors related to session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session '{0}' not found")]
    NotFound(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Statistics(#[from] StatsError),
}

impl SessionError {
    /// Whether retrying the same call could succeed.
    ///
    /// Missing sessions and malformed input will fail the same way again;
    /// storage failures may be transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::NotFound(_) | SessionError::Validation(_) => false,
            SessionError::Storage(_) => true,
            SessionError::Statistics(e) => e.is_retryable(),
        }
    }
}

/// Errors related to the session statistics counters.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("no statistics counter exists for {0}")]
    MissingCounter(NaiveDate),

    #[error("storage error: {0}")]
    Storage(String),
}

impl StatsError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StatsError::Storage(_))
    }
}

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for SessionError {
    fn from(e: RepositoryError) -> Self {
        SessionError::Storage(e.to_string())
    }
}

impl From<RepositoryError> for StatsError {
    fn from(e: RepositoryError) -> Self {
        StatsError::Storage(e.to_string())
    }
}
