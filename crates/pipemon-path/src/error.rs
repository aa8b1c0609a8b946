//! Path template error types

use thiserror::Error;

/// Path parsing and resolution errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Malformed template
    #[error("syntax error at position {position}: {message}")]
    Syntax {
        /// Byte offset into the template source
        position: usize,
        /// What the parser expected
        message: String,
    },

    /// Field lookup on a value without that field
    #[error("{field} is not found")]
    NotFound {
        /// Field name
        field: String,
    },

    /// List index outside the list
    #[error("array index out of bounds: index {index}, length {len}")]
    IndexOutOfBounds {
        /// Requested index, possibly negative
        index: i64,
        /// List length
        len: usize,
    },

    /// Index or slice applied to a non-list value
    #[error("cannot index into {found}")]
    NotIndexable {
        /// Type of the value
        found: &'static str,
    },

    /// Filter applied to a value that is neither a list nor a map
    #[error("cannot filter {found}")]
    NotFilterable {
        /// Type of the value
        found: &'static str,
    },
}

/// Result type for path operations
pub type PathResult<T> = Result<T, PathError>;
