//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository traits, but AppState pins them to the
//! SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;

use parley_core::service::session::SessionService;
use parley_core::service::stats::StatisticsAggregator;
use parley_infra::config::{load_service_config, resolve_data_dir};
use parley_infra::sqlite::pool::{DatabasePool, database_url};
use parley_infra::sqlite::session::SqliteSessionRepository;
use parley_infra::sqlite::stats::SqliteStatisticsRepository;
use parley_types::config::ServiceConfig;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteSessionService = SessionService<SqliteSessionRepository, SqliteStatisticsRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<ConcreteSessionService>,
    pub config: Arc<ServiceConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_service_config(&data_dir).await;
        let db_pool = DatabasePool::with_config(&database_url(&data_dir), &config.store).await?;

        tracing::debug!(
            data_dir = %data_dir.display(),
            missing_counter = %config.statistics.missing_counter,
            "Application state initialized"
        );

        Ok(Self::from_parts(db_pool, config, data_dir))
    }

    /// Wire services on top of an already-open pool.
    pub fn from_parts(db_pool: DatabasePool, config: ServiceConfig, data_dir: PathBuf) -> Self {
        let aggregator = StatisticsAggregator::new(
            SqliteStatisticsRepository::new(db_pool.clone()),
            config.statistics.missing_counter,
        );
        let session_service =
            SessionService::new(SqliteSessionRepository::new(db_pool), aggregator);

        Self {
            session_service: Arc::new(session_service),
            config: Arc::new(config),
            data_dir,
        }
    }
}
