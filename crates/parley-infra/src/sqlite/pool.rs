//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. This module provides a `DatabasePool`
//! with a multi-connection reader pool for concurrent reads and a single-connection
//! writer pool for serialized writes. Both use WAL journal mode.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use parley_types::config::StoreConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection pool for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERT/UPDATE/DELETE.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Create a pool with the default store settings.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::with_config(database_url, &StoreConfig::default()).await
    }

    /// Create a new DatabasePool with split reader/writer connections.
    ///
    /// Runs migrations automatically on the writer pool. A call that cannot
    /// get a connection within `acquire_timeout_secs`, or that waits on a
    /// locked database longer than `busy_timeout_secs`, fails instead of
    /// hanging.
    pub async fn with_config(database_url: &str, config: &StoreConfig) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;
        let acquire_timeout = Duration::from_secs(config.acquire_timeout_secs);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(acquire_timeout)
            .connect_with(write_opts)
            .await?;

        // Run migrations on writer before opening reader pool
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(config.max_readers.max(1))
            .acquire_timeout(acquire_timeout)
            .connect_with(read_opts)
            .await?;

        Ok(Self { reader, writer })
    }
}

/// Database URL for `{data_dir}/parley.db`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("parley.db").display())
}
