//! # pipemon-metrics
//!
//! Measures, views and aggregation for pipemon.
//!
//! Features:
//! - Measures and measurements
//! - Views binding a measure to an aggregation and a tag-key schema
//! - Count, sum, last-value and distribution aggregation per tag set
//! - Idempotent view registration and a process-wide store
//! - JSON and Prometheus text export
//!
//! ## Architecture
//!
//! ```text
//! Recorder::record(tags, measurements)
//!          |
//! +------------------+
//! |     Metrics      |  <- registered views, keyed by name
//! +------------------+
//!          |
//! +------------------+
//! |  rows per view   |  <- one aggregated row per tag-value tuple
//! +------------------+
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod collector;
mod error;
mod export;
mod histogram;
mod measure;
mod tags;
mod view;

pub use collector::{global, Attachments, Metrics, Recorder};
pub use error::{MetricsError, MetricsResult};
pub use export::{DistributionData, MetricsSnapshot, RowData, RowSnapshot, ViewSnapshot};
pub use histogram::Histogram;
pub use measure::{Measure, Measurement, Unit};
pub use tags::{TagKey, TagSet};
pub use view::{Aggregation, View};
