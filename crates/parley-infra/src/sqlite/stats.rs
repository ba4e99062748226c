//! SQLite statistics repository implementation.
//!
//! Each date's counter is a row of `daily_counters`; the rows ordered by
//! `position` make up the `sessionStats` document. Increments are single
//! `UPDATE ... SET col = col + 1` (or upsert) statements, so SQLite applies
//! them atomically no matter how many connections or processes race.

use chrono::NaiveDate;
use parley_core::repository::stats::StatisticsRepository;
use parley_types::error::RepositoryError;
use parley_types::stats::{CounterKind, DailyCounter};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_date, parse_date, query_error};

/// SQLite-backed implementation of `StatisticsRepository`.
#[derive(Clone)]
pub struct SqliteStatisticsRepository {
    pool: DatabasePool,
}

impl SqliteStatisticsRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_counter(row: &sqlx::sqlite::SqliteRow) -> Result<DailyCounter, RepositoryError> {
    let date: String = row.try_get("date").map_err(query_error)?;
    let saved: i64 = row.try_get("saved_sessions").map_err(query_error)?;
    let deleted: i64 = row.try_get("deleted_sessions").map_err(query_error)?;

    Ok(DailyCounter {
        date: parse_date(&date)?,
        saved_sessions: saved as u64,
        deleted_sessions: deleted as u64,
    })
}

impl StatisticsRepository for SqliteStatisticsRepository {
    async fn increment(
        &self,
        date: NaiveDate,
        kind: CounterKind,
        create_missing: bool,
    ) -> Result<Option<DailyCounter>, RepositoryError> {
        let col = kind.column();
        let sql = if create_missing {
            format!(
                "INSERT INTO daily_counters (date, {col}) VALUES (?, 1)
                 ON CONFLICT (date) DO UPDATE SET {col} = {col} + 1
                 RETURNING date, saved_sessions, deleted_sessions"
            )
        } else {
            format!(
                "UPDATE daily_counters SET {col} = {col} + 1 WHERE date = ?
                 RETURNING date, saved_sessions, deleted_sessions"
            )
        };

        let row = sqlx::query(&sql)
            .bind(format_date(&date))
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(query_error)?;

        row.as_ref().map(row_to_counter).transpose()
    }

    async fn get(&self, date: NaiveDate) -> Result<Option<DailyCounter>, RepositoryError> {
        let row = sqlx::query(
            "SELECT date, saved_sessions, deleted_sessions FROM daily_counters WHERE date = ?",
        )
        .bind(format_date(&date))
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        row.as_ref().map(row_to_counter).transpose()
    }

    async fn list(&self) -> Result<Vec<DailyCounter>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT date, saved_sessions, deleted_sessions FROM daily_counters ORDER BY position ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(row_to_counter).collect()
    }

    async fn seed(&self, date: NaiveDate) -> Result<DailyCounter, RepositoryError> {
        let date_str = format_date(&date);
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query("INSERT INTO daily_counters (date) VALUES (?) ON CONFLICT (date) DO NOTHING")
            .bind(&date_str)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        let row = sqlx::query(
            "SELECT date, saved_sessions, deleted_sessions FROM daily_counters WHERE date = ?",
        )
        .bind(&date_str)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;

        row_to_counter(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;
    use parley_core::service::stats::StatisticsAggregator;
    use parley_types::stats::MissingCounterPolicy;
    use std::sync::Arc;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(dir.path());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn insert_counter(pool: &DatabasePool, d: &str, saved: i64, deleted: i64) {
        sqlx::query(
            "INSERT INTO daily_counters (date, saved_sessions, deleted_sessions) VALUES (?, ?, ?)",
        )
        .bind(d)
        .bind(saved)
        .bind(deleted)
        .execute(&pool.writer)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_increment_existing_counter() {
        let pool = test_pool().await;
        insert_counter(&pool, "2024-01-01", 3, 1).await;
        let repo = SqliteStatisticsRepository::new(pool);

        let saved = repo
            .increment(date("2024-01-01"), CounterKind::Saved, false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.saved_sessions, 4);
        assert_eq!(saved.deleted_sessions, 1);

        let deleted = repo
            .increment(date("2024-01-01"), CounterKind::Deleted, false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(deleted.saved_sessions, 4);
        assert_eq!(deleted.deleted_sessions, 2);
    }

    #[tokio::test]
    async fn test_increment_missing_without_create_writes_nothing() {
        let repo = SqliteStatisticsRepository::new(test_pool().await);

        let result = repo
            .increment(date("2024-01-01"), CounterKind::Saved, false)
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_increment_missing_with_create_appends() {
        let pool = test_pool().await;
        insert_counter(&pool, "2024-01-01", 3, 1).await;
        let repo = SqliteStatisticsRepository::new(pool);

        let counter = repo
            .increment(date("2024-01-02"), CounterKind::Deleted, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(counter, DailyCounter {
            date: date("2024-01-02"),
            saved_sessions: 0,
            deleted_sessions: 1,
        });

        let all = repo.list().await.unwrap();
        let dates: Vec<String> = all.iter().map(|c| c.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);
    }

    #[tokio::test]
    async fn test_list_keeps_first_appearance_order() {
        let repo = SqliteStatisticsRepository::new(test_pool().await);
        for d in ["2024-02-10", "2024-01-05", "2024-03-01"] {
            repo.increment(date(d), CounterKind::Saved, true).await.unwrap();
        }
        repo.increment(date("2024-01-05"), CounterKind::Saved, true)
            .await
            .unwrap();

        let all = repo.list().await.unwrap();
        let dates: Vec<String> = all.iter().map(|c| c.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-02-10", "2024-01-05", "2024-03-01"]);
        assert_eq!(all[1].saved_sessions, 2);
    }

    #[tokio::test]
    async fn test_get() {
        let pool = test_pool().await;
        insert_counter(&pool, "2024-01-01", 3, 1).await;
        let repo = SqliteStatisticsRepository::new(pool);

        let counter = repo.get(date("2024-01-01")).await.unwrap().unwrap();
        assert_eq!(counter.saved_sessions, 3);
        assert!(repo.get(date("2024-01-02")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = test_pool().await;
        insert_counter(&pool, "2024-01-01", 3, 1).await;
        let repo = SqliteStatisticsRepository::new(pool);

        let existing = repo.seed(date("2024-01-01")).await.unwrap();
        assert_eq!(existing.saved_sessions, 3);

        let fresh = repo.seed(date("2024-01-02")).await.unwrap();
        assert_eq!(fresh, DailyCounter::zero(date("2024-01-02")));
        repo.seed(date("2024-01-02")).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ten_concurrent_saves_counted_exactly() {
        let pool = test_pool().await;
        insert_counter(&pool, "2024-01-01", 3, 1).await;
        let aggregator = Arc::new(StatisticsAggregator::new(
            SqliteStatisticsRepository::new(pool),
            MissingCounterPolicy::Reject,
        ));

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

        let all = aggregator.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].saved_sessions, 13);
        assert_eq!(all[0].deleted_sessions, 1);
    }

    #[tokio::test]
    async fn test_independent_pools_do_not_lose_updates() {
        // Two pools on one file behave like two processes sharing the store.
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(dir.path());
        let pool_a = DatabasePool::new(&url).await.unwrap();
        let pool_b = DatabasePool::new(&url).await.unwrap();
        let repo_a = SqliteStatisticsRepository::new(pool_a);
        let repo_b = SqliteStatisticsRepository::new(pool_b);

        let mut handles = Vec::new();
        for i in 0..20 {
            let repo = if i % 2 == 0 { repo_a.clone() } else { repo_b.clone() };
            let kind = if i % 4 < 2 { CounterKind::Saved } else { CounterKind::Deleted };
            handles.push(tokio::spawn(async move {
                repo.increment(date("2024-05-05"), kind, true).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let counter = repo_a.get(date("2024-05-05")).await.unwrap().unwrap();
        assert_eq!(counter.saved_sessions + counter.deleted_sessions, 20);
        assert_eq!(counter.saved_sessions, 10);
        assert_eq!(repo_b.list().await.unwrap().len(), 1);
    }
}
