//! Session and message types.
//!
//! A session is an ordered list of messages stored under an opaque id.
//! Messages are kept as raw JSON objects; their internal shape (usually a
//! `role`/`content` pair) is never interpreted by Parley.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single message inside a session.
///
/// Serialized transparently, so `{"role":"user","content":"hi"}` on the wire
/// is exactly what gets stored and returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(pub serde_json::Value);

impl Message {
    /// Messages must be JSON objects. Anything else is rejected at the edge.
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }
}

/// A stored conversation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Build a brand new session with a freshly generated id.
    pub fn new(messages: Vec<Message>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_session_id(),
            messages,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Generate a new session id (UUID v4, 122 random bits).
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_transparently() {
        let msg = Message(json!({"role": "user", "content": "hi"}));
        let s = serde_json::to_string(&msg).unwrap();
        assert_eq!(s, r#"{"content":"hi","role":"user"}"#);
    }

    #[test]
    fn test_message_is_object() {
        assert!(Message(json!({"role": "user"})).is_object());
        assert!(!Message(json!("hello")).is_object());
        assert!(!Message(json!([1, 2])).is_object());
    }

    #[test]
    fn test_new_session_has_unique_id() {
        let a = Session::new(Vec::new());
        let b = Session::new(Vec::new());
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_generated_id_is_uuid_v4() {
        let id = generate_session_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}
