//! Metrics error types

use thiserror::Error;

/// View registration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// View definition rejected
    #[error("invalid view {name:?}: {reason}")]
    InvalidView {
        /// View name
        name: String,
        /// Why the view was rejected
        reason: String,
    },

    /// Same name registered with a different definition
    #[error("view {0:?} is already registered with a different definition")]
    ViewConflict(String),

    /// No view with that name
    #[error("view {0:?} is not registered")]
    UnknownView(String),
}

/// Result type for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;
