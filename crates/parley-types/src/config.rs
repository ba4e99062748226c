//! Service configuration types for Parley.
//!
//! `ServiceConfig` represents the top-level `config.toml` that controls the
//! HTTP listener, store timeouts, and the statistics missing-counter policy.

use serde::{Deserialize, Serialize};

use crate::stats::MissingCounterPolicy;

/// Top-level configuration.
///
/// Loaded from `~/.parley/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub statistics: StatisticsConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by the CORS layer. `"*"` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Document store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// How long a write waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,

    /// How long a call waits for a free pool connection before failing.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Size of the read-only connection pool.
    #[serde(default = "default_max_readers")]
    pub max_readers: u32,
}

fn default_busy_timeout_secs() -> u64 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_max_readers() -> u32 {
    8
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_secs: default_busy_timeout_secs(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            max_readers: default_max_readers(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsConfig {
    #[serde(default)]
    pub missing_counter: MissingCounterPolicy,
}
