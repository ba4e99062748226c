//! Statistics aggregator owning the per-date session counters.
//!
//! The aggregator is the only writer of the counters. It never reads a
//! counter, edits it, and writes it back: every update is a single atomic
//! increment executed by the store, so concurrent saves and deletes on the
//! same date are never lost, even across processes.

use chrono::NaiveDate;
use parley_types::error::StatsError;
use parley_types::stats::{CounterKind, DailyCounter, MissingCounterPolicy, StatisticsDocument};
use tracing::{debug, warn};

use crate::repository::stats::StatisticsRepository;

/// Maintains the `sessionStats` counters.
pub struct StatisticsAggregator<T: StatisticsRepository> {
    repo: T,
    policy: MissingCounterPolicy,
}

impl<T: StatisticsRepository> StatisticsAggregator<T> {
    pub fn new(repo: T, policy: MissingCounterPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> MissingCounterPolicy {
        self.policy
    }

    /// Count one saved session on `date`.
    pub async fn record_save(&self, date: NaiveDate) -> Result<DailyCounter, StatsError> {
        self.record(date, CounterKind::Saved).await
    }

    /// Count one deleted session on `date`.
    pub async fn record_delete(&self, date: NaiveDate) -> Result<DailyCounter, StatsError> {
        self.record(date, CounterKind::Deleted).await
    }

    async fn record(&self, date: NaiveDate, kind: CounterKind) -> Result<DailyCounter, StatsError> {
        let create_missing = self.policy == MissingCounterPolicy::Create;

        match self.repo.increment(date, kind, create_missing).await? {
            Some(counter) => {
                debug!(%date, %kind, value = counter.get(kind), "Session counter incremented");
                Ok(counter)
            }
            None => {
                warn!(%date, %kind, "No statistics counter for date, increment rejected");
                Err(StatsError::MissingCounter(date))
            }
        }
    }

    /// Fail early if an event on `date` would be rejected.
    ///
    /// Only meaningful under [`MissingCounterPolicy::Reject`]. Counters are
    /// never removed, so a positive answer stays valid.
    pub async fn ensure_recordable(&self, date: NaiveDate) -> Result<(), StatsError> {
        if self.policy == MissingCounterPolicy::Create {
            return Ok(());
        }
        match self.repo.get(date).await? {
            Some(_) => Ok(()),
            None => Err(StatsError::MissingCounter(date)),
        }
    }

    /// Snapshot of every counter.
    pub async fn get_all(&self) -> Result<Vec<DailyCounter>, StatsError> {
        Ok(self.repo.list().await?)
    }

    /// Snapshot wrapped as the `sessionStats` document.
    pub async fn document(&self) -> Result<StatisticsDocument, StatsError> {
        Ok(StatisticsDocument {
            total_sessions: self.get_all().await?,
        })
    }

    /// Create a zero counter for `date` so events on it are accepted under
    /// the `reject` policy. Idempotent.
    pub async fn seed(&self, date: NaiveDate) -> Result<DailyCounter, StatsError> {
        let counter = self.repo.seed(date).await?;
        debug!(%date, "Statistics counter seeded");
        Ok(counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStats, date};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_record_save_increments_existing_counter() {
        let repo = MemoryStats::default().with_counter("2024-01-01", 3, 1);
        let aggregator = StatisticsAggregator::new(repo, MissingCounterPolicy::Create);

        let counter = aggregator.record_save(date("2024-01-01")).await.unwrap();
        assert_eq!(counter.saved_sessions, 4);
        assert_eq!(counter.deleted_sessions, 1);
    }

    #[tokio::test]
    async fn test_record_delete_increments_deleted_only() {
        let repo = MemoryStats::default().with_counter("2024-01-01", 3, 1);
        let aggregator = StatisticsAggregator::new(repo, MissingCounterPolicy::Create);

        let counter = aggregator.record_delete(date("2024-01-01")).await.unwrap();
        assert_eq!(counter.saved_sessions, 3);
        assert_eq!(counter.deleted_sessions, 2);
    }

    #[tokio::test]
    async fn test_create_policy_appends_missing_date() {
        let repo = MemoryStats::default().with_counter("2024-01-01", 3, 1);
        let aggregator = StatisticsAggregator::new(repo, MissingCounterPolicy::Create);

        aggregator.record_save(date("2024-01-02")).await.unwrap();

        let all = aggregator.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].date, date("2024-01-02"));
        assert_eq!(all[1].saved_sessions, 1);
        assert_eq!(all[1].deleted_sessions, 0);
    }

    #[tokio::test]
    async fn test_reject_policy_surfaces_missing_counter() {
        let repo = MemoryStats::default();
        let aggregator = StatisticsAggregator::new(repo, MissingCounterPolicy::Reject);

        let err = aggregator.record_save(date("2024-01-01")).await.unwrap_err();
        assert!(matches!(err, StatsError::MissingCounter(d) if d == date("2024-01-01")));
        assert!(aggregator.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_recordable() {
        let repo = MemoryStats::default().with_counter("2024-01-01", 0, 0);
        let reject = StatisticsAggregator::new(repo, MissingCounterPolicy::Reject);
        assert!(reject.ensure_recordable(date("2024-01-01")).await.is_ok());
        assert!(reject.ensure_recordable(date("2024-01-02")).await.is_err());

        let create = StatisticsAggregator::new(MemoryStats::default(), MissingCounterPolicy::Create);
        assert!(create.ensure_recordable(date("2024-01-02")).await.is_ok());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent_and_unlocks_reject_policy() {
        let aggregator =
            StatisticsAggregator::new(MemoryStats::default(), MissingCounterPolicy::Reject);
        let d = date("2024-03-10");

        aggregator.seed(d).await.unwrap();
        aggregator.record_save(d).await.unwrap();
        let again = aggregator.seed(d).await.unwrap();

        assert_eq!(again.saved_sessions, 1);
        assert_eq!(aggregator.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_is_retryable() {
        let repo = MemoryStats::default().with_counter("2024-01-01", 0, 0);
        repo.fail_writes();
        let aggregator = StatisticsAggregator::new(repo, MissingCounterPolicy::Create);

        let err = aggregator.record_save(date("2024-01-01")).await.unwrap_err();
        assert!(matches!(err, StatsError::Storage(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_concurrent_saves_are_all_counted() {
        let repo = MemoryStats::default().with_counter("2024-01-01", 3, 1);
        let aggregator = Arc::new(StatisticsAggregator::new(repo, MissingCounterPolicy::Create));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let aggregator = Arc::clone(&aggregator);
            handles.push(tokio::spawn(async move {
                aggregator.record_save(date("2024-01-01")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let doc = aggregator.document().await.unwrap();
        let counter = doc.counter_for(date("2024-01-01")).unwrap();
        assert_eq!(counter.saved_sessions, 13);
        assert_eq!(counter.deleted_sessions, 1);
    }
}
