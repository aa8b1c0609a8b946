//! Error types for record loading

use thiserror::Error;

/// Record loading errors
#[derive(Debug, Error)]
pub enum TypesError {
    /// Malformed JSON or a field of the wrong shape
    #[error("invalid record: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level JSON is neither an object nor an array of objects
    #[error("expected a JSON object or array of objects, found {0}")]
    UnexpectedShape(&'static str),
}

/// Result type for record loading
pub type TypesResult<T> = Result<T, TypesError>;
