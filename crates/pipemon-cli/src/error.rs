//! CLI error types

use pipemon_metrics::MetricsError;
use pipemon_recorder::RecordError;
use pipemon_types::TypesError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration and input errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Configuration is not valid TOML for the monitor schema
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Monitors could not be built
    #[error("invalid monitors: {0}")]
    Monitors(#[from] RecordError),

    /// Views could not be registered
    #[error("view registration failed: {0}")]
    Views(#[from] MetricsError),

    /// Run file could not be decoded
    #[error("invalid run file {path}: {source}")]
    Records {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: TypesError,
    },
}
