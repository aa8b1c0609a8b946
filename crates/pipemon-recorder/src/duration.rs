//! Duration extraction

use crate::error::{RecordError, RecordResult};
use crate::normalize::parse_time;
use pipemon_path::{PathTemplate, Value};
use pipemon_primitives::Time;
use pipemon_types::DurationSpec;

pub use pipemon_primitives::{must_parse_rfc3339, parse_rfc3339};

/// Start and end of an observed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBounds {
    /// Interval start, unset if the record does not carry it yet
    pub from: Option<Time>,
    /// Interval end, unset if the record does not carry it yet
    pub to: Option<Time>,
}

impl DurationBounds {
    /// Seconds from `from` to `to`, when both are set.
    ///
    /// Negative when `to` precedes `from`.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        Some(self.to?.seconds_since(&self.from?))
    }

    /// Check both ends are set
    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

/// Resolve both ends of `spec` against `input`.
///
/// Both paths are evaluated as the single template `{from}{to}`, each side
/// has to produce exactly one value.
pub fn parse_duration(spec: &DurationSpec, input: &Value) -> RecordResult<DurationBounds> {
    let template = PathTemplate::concat(&spec.from, &spec.to)?;
    let results = template.find_results(input)?;

    if results.len() != 2 {
        return Err(RecordError::ResultCount(results.len()));
    }
    if results[0].len() != 1 {
        return Err(RecordError::FromCount(results[0].len()));
    }
    if results[1].len() != 1 {
        return Err(RecordError::ToCount(results[1].len()));
    }

    let from = parse_time("from", results[0][0])?;
    let to = parse_time("to", results[1][0])?;
    Ok(DurationBounds { from, to })
}
