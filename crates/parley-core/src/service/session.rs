//! Session service implementing the get/list/save/delete operations.
//!
//! Session writes and counter updates are ordered so the counters never
//! count an operation that did not happen: the session mutation runs first
//! and the counter is incremented only after it succeeded. Under the
//! `reject` policy the counter's existence is checked before anything is
//! written.

use chrono::NaiveDate;
use parley_types::api::{DeleteConfirmation, ValidSave};
use parley_types::error::{RepositoryError, SessionError};
use parley_types::session::Session;
use tracing::{error, info};

use crate::repository::session::SessionRepository;
use crate::repository::stats::StatisticsRepository;
use crate::service::stats::StatisticsAggregator;

/// Orchestrates session persistence and the statistics side effects.
///
/// Generic over `SessionRepository` and `StatisticsRepository` to maintain
/// clean architecture (parley-core never depends on parley-infra).
pub struct SessionService<S: SessionRepository, T: StatisticsRepository> {
    sessions: S,
    stats: StatisticsAggregator<T>,
}

impl<S: SessionRepository, T: StatisticsRepository> SessionService<S, T> {
    pub fn new(sessions: S, stats: StatisticsAggregator<T>) -> Self {
        Self { sessions, stats }
    }

    /// Access the session repository.
    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Access the statistics aggregator.
    pub fn stats(&self) -> &StatisticsAggregator<T> {
        &self.stats
    }

    /// Get a session by id.
    pub async fn get(&self, id: &str) -> Result<Session, SessionError> {
        self.sessions
            .get(id)
            .await?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// List every stored session. Always read straight from the store.
    pub async fn list(&self) -> Result<Vec<Session>, SessionError> {
        Ok(self.sessions.list().await?)
    }

    /// Create a session (no id) or replace an existing session's messages.
    ///
    /// Counts one saved session on `save.date` once the write succeeded.
    pub async fn save(&self, save: ValidSave) -> Result<Session, SessionError> {
        self.stats.ensure_recordable(save.date).await?;

        let session = match save.session_id {
            None => {
                let session = Session::new(save.messages);
                let created = self.sessions.create(&session).await.map_err(|e| match e {
                    RepositoryError::Conflict(msg) => {
                        SessionError::Storage(format!("generated id collided: {msg}"))
                    }
                    other => other.into(),
                })?;
                info!(session_id = %created.id, messages = created.message_count(), "Session created");
                created
            }
            Some(id) => {
                let updated = self
                    .sessions
                    .replace_messages(&id, &save.messages)
                    .await?
                    .ok_or_else(|| SessionError::NotFound(id.clone()))?;
                info!(session_id = %id, messages = updated.message_count(), "Session messages replaced");
                updated
            }
        };

        if let Err(e) = self.stats.record_save(save.date).await {
            error!(session_id = %session.id, date = %save.date, error = %e,
                "Session saved but saved-session counter was not updated");
            return Err(e.into());
        }

        Ok(session)
    }

    /// Delete a session and count it on `date`.
    ///
    /// Deleting an id that does not exist is `NotFound` and leaves the
    /// counters untouched.
    pub async fn delete(&self, id: &str, date: NaiveDate) -> Result<DeleteConfirmation, SessionError> {
        self.stats.ensure_recordable(date).await?;

        let deleted_at = self
            .sessions
            .delete(id)
            .await?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        info!(session_id = %id, "Session deleted");

        if let Err(e) = self.stats.record_delete(date).await {
            error!(session_id = %id, %date, error = %e,
                "Session deleted but deleted-session counter was not updated");
            return Err(e.into());
        }

        Ok(DeleteConfirmation::new(id.to_string(), deleted_at))
    }
}
