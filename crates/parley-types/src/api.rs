//! Request and response payloads for the five session operations.
//!
//! Field names follow the camelCase wire format used by the web client
//! (`sessionId`, `newMessages`). Every request has a `validate()` that turns
//! malformed input into `SessionError::Validation` before any store access.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::session::{Message, Session};
use crate::stats::DailyCounter;

/// `getSession` input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSessionRequest {
    pub session_id: Option<String>,
}

impl GetSessionRequest {
    /// Returns the required session id.
    pub fn validate(&self) -> Result<&str, SessionError> {
        require_session_id(self.session_id.as_deref())
    }
}

/// `saveSession` input.
///
/// A missing or null `sessionId` creates a new session. A missing `date`
/// means "today" (UTC).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub new_messages: Option<Vec<Message>>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// A `saveSession` request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSave {
    pub session_id: Option<String>,
    pub messages: Vec<Message>,
    pub date: NaiveDate,
}

impl SaveSessionRequest {
    pub fn validate(self, today: NaiveDate) -> Result<ValidSave, SessionError> {
        let session_id = match self.session_id {
            // An empty id is treated the same as no id, like the web client does.
            Some(id) if id.trim().is_empty() => None,
            Some(id) => Some(id),
            None => None,
        };

        let messages = self
            .new_messages
            .ok_or_else(|| SessionError::Validation("newMessages is required".to_string()))?;

        if let Some(pos) = messages.iter().position(|m| !m.is_object()) {
            return Err(SessionError::Validation(format!(
                "newMessages[{pos}] must be a JSON object"
            )));
        }

        Ok(ValidSave {
            session_id,
            messages,
            date: self.date.unwrap_or(today),
        })
    }
}

/// `deleteSession` input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl DeleteSessionRequest {
    /// Returns the session id and the effective statistics date.
    pub fn validate(&self, today: NaiveDate) -> Result<(&str, NaiveDate), SessionError> {
        let id = require_session_id(self.session_id.as_deref())?;
        Ok((id, self.date.unwrap_or(today)))
    }
}

/// `getSession` / `saveSession` output, and one element of `getSessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub messages: Vec<Message>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.id,
            messages: session.messages,
        }
    }
}

/// `deleteSession` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteConfirmation {
    pub session_id: String,
    pub deleted_at: DateTime<Utc>,
    pub message: String,
}

impl DeleteConfirmation {
    pub fn new(session_id: String, deleted_at: DateTime<Utc>) -> Self {
        let message = format!(
            "The {session_id} session was deleted at {}",
            deleted_at.to_rfc3339()
        );
        Self {
            session_id,
            deleted_at,
            message,
        }
    }
}

/// `getStatistics` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub stats: Vec<DailyCounter>,
}

/// Ids are opaque: whitespace only matters for the emptiness check and the
/// id is passed on exactly as given, like `SaveSessionRequest::validate`.
fn require_session_id(id: Option<&str>) -> Result<&str, SessionError> {
    match id {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(SessionError::Validation("sessionId is required".to_string())),
    }
}
