//! Shared types and configuration for the sentrend workspace.

pub mod app_config;
pub mod config;
pub mod queries;
pub mod records;

use thiserror::Error;

pub use app_config::EngineConfig;
pub use config::{load_engine_config, load_engine_config_from_env};
pub use queries::{load_queries, QueriesFile, QueryGroup};
pub use records::{MetricBag, MetricValue, RawRecord, Source};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read queries file {path}: {source}")]
    QueriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse queries file: {0}")]
    QueriesFileParse(#[from] serde_yaml::Error),

    #[error("queries validation failed: {0}")]
    Validation(String),
}
