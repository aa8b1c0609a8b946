//! Recording error types

use pipemon_path::PathError;
use thiserror::Error;

/// Errors raised while extracting values from a record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Path template failed to parse or resolve
    #[error(transparent)]
    Path(#[from] PathError),

    /// Duration template did not produce one result list per side
    #[error("unable to parse duration, got {0} results")]
    ResultCount(usize),

    /// `from` side did not resolve to exactly one value
    #[error("unable to parse 'from' duration, got {0} results")]
    FromCount(usize),

    /// `to` side did not resolve to exactly one value
    #[error("unable to parse 'to' duration, got {0} results")]
    ToCount(usize),

    /// Resolved value is not a timestamp
    #[error("could not parse '{field}' duration, wrong type {found}")]
    WrongType {
        /// `from` or `to`
        field: String,
        /// Type of the resolved value
        found: &'static str,
    },

    /// Label path did not resolve to exactly one value
    #[error("tag path {path} resolved to {count} values, expected exactly 1")]
    TagResultCount {
        /// Label path expression
        path: String,
        /// Number of values found
        count: usize,
    },

    /// Record has neither a uid nor a name
    #[error("run has neither metadata.uid nor metadata.name")]
    MissingIdentity,

    /// Two monitors share a name
    #[error("duplicate monitor {0:?}")]
    DuplicateMonitor(String),

    /// Two metrics of the same kind share a name within a monitor
    #[error("duplicate {kind} metric {metric:?} in monitor {monitor:?}")]
    DuplicateMetric {
        /// Monitor name
        monitor: String,
        /// Metric kind
        kind: &'static str,
        /// Metric name
        metric: String,
    },
}

/// Result type for recording operations
pub type RecordResult<T> = Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            RecordError::FromCount(0).to_string(),
            "unable to parse 'from' duration, got 0 results"
        );
        let err = RecordError::WrongType {
            field: "to".into(),
            found: "string",
        };
        assert_eq!(err.to_string(), "could not parse 'to' duration, wrong type string");
    }

    #[test]
    fn test_path_error_is_transparent() {
        let err: RecordError = PathError::NotFound {
            field: "podName".into(),
        }
        .into();
        assert_eq!(err.to_string(), "podName is not found");
    }
}
