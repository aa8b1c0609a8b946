//! # pipemon-recorder
//!
//! Metrics extracted from run records through path expressions.
//!
//! Features:
//! - Timestamp normalization over every timestamp representation
//! - Duration extraction from a `{from}{to}` path pair
//! - Label sets built from `by` path expressions
//! - Histogram, counter and gauge metric kinds behind one [`Metric`] contract
//! - [`Monitor`] and [`MonitorSet`] registries routing records to metrics
//!
//! ## Usage
//!
//! ```ignore
//! use pipemon_recorder::MonitorSet;
//!
//! let monitors = MonitorSet::new(&config.monitors)?;
//! monitors.register_views(pipemon_metrics::global())?;
//! monitors.record(pipemon_metrics::global(), &run);
//! ```
//!
//! Recording never fails: bad paths and malformed records are logged and
//! the observation is skipped.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod counter;
pub mod duration;
mod error;
mod gauge;
mod histogram;
mod identity;
mod metric;
mod monitor;
pub mod naming;
pub mod normalize;
pub mod tags;

pub use counter::CounterMetric;
pub use duration::{must_parse_rfc3339, parse_duration, parse_rfc3339, DurationBounds};
pub use error::{RecordError, RecordResult};
pub use gauge::GaugeMetric;
pub use histogram::{HistogramMetric, DURATION_BUCKETS};
pub use identity::run_identity;
pub use metric::{Metric, MonitorMetric};
pub use monitor::{Monitor, MonitorSet};
pub use normalize::parse_time;
pub use tags::{tag_key_for, tag_set_from_by, view_tags};
