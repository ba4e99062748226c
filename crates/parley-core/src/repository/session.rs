//! Session repository trait definition.

use chrono::{DateTime, Utc};
use parley_types::error::RepositoryError;
use parley_types::session::{Message, Session};

/// Repository trait for session document persistence.
///
/// Every method is a single store operation; implementations must make each
/// one atomic on its own.
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait SessionRepository: Send + Sync {
    /// Get a session by id. Returns `None` if it does not exist.
    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// List every stored session in store order.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Session>, RepositoryError>> + Send;

    /// Insert a new session. Returns `Conflict` if the id is already taken.
    fn create(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<Session, RepositoryError>> + Send;

    /// Replace the whole message list of an existing session.
    ///
    /// Returns the updated session, or `None` if no session has this id.
    fn replace_messages(
        &self,
        id: &str,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// Delete a session. Returns the deletion time, or `None` if nothing was deleted.
    fn delete(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<DateTime<Utc>>, RepositoryError>> + Send;

    /// Count stored sessions.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
