//! Error types for primitives

use thiserror::Error;

/// Timestamp parsing error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Input is not an RFC 3339 timestamp
    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    InvalidRfc3339 {
        /// Rejected input
        input: String,
        /// Parser message
        reason: String,
    },

    /// Unix time outside the representable range
    #[error("unix time out of range: {secs}s {nanos}ns")]
    OutOfRange {
        /// Seconds since the epoch
        secs: i64,
        /// Sub-second nanoseconds
        nanos: u32,
    },
}
