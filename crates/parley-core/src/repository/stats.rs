//! Statistics repository trait definition.
//!
//! The counters are updated with store-native atomic increments, never by
//! reading the document, editing it in memory, and writing it back. Two
//! processes incrementing the same date concurrently must both be counted.

use chrono::NaiveDate;
use parley_types::error::RepositoryError;
use parley_types::stats::{CounterKind, DailyCounter};

/// Repository trait for the per-date session counters.
pub trait StatisticsRepository: Send + Sync {
    /// Atomically add one to `kind` on the counter for `date`.
    ///
    /// When `create_missing` is true a zero counter is appended first if the
    /// date has none (in the same statement). When false and no counter
    /// exists, nothing is written and `None` is returned.
    fn increment(
        &self,
        date: NaiveDate,
        kind: CounterKind,
        create_missing: bool,
    ) -> impl std::future::Future<Output = Result<Option<DailyCounter>, RepositoryError>> + Send;

    /// Get the counter for one date.
    fn get(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Option<DailyCounter>, RepositoryError>> + Send;

    /// All counters, ordered by first appearance of their date.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<DailyCounter>, RepositoryError>> + Send;

    /// Create a zero counter for `date` if none exists (idempotent).
    ///
    /// Returns the counter as stored after the call.
    fn seed(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<DailyCounter, RepositoryError>> + Send;
}
