//! # pipemon-primitives
//!
//! Primitive types shared by the pipemon crates.
//!
//! The main export is [`Time`], the wrapped timestamp used by run records,
//! together with the RFC 3339 helpers used to build one from text.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod time;

pub use error::TimeError;
pub use time::{must_parse_rfc3339, parse_rfc3339, Time};

/// Re-export of the plain timestamp type
pub use chrono::{DateTime, Utc};
