//! Views: a measure, an aggregation and a tag-key schema

use crate::error::{MetricsError, MetricsResult};
use crate::measure::Measure;
use crate::tags::TagKey;
use std::collections::HashSet;

/// How measurements of a view are combined
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Number of measurements
    Count,
    /// Sum of measured values
    Sum,
    /// Most recent measured value
    LastValue,
    /// Bucketed distribution with the given upper bounds
    Distribution(Vec<f64>),
}

impl Aggregation {
    /// Distribution over the given bucket bounds
    pub fn distribution(bounds: &[f64]) -> Self {
        Aggregation::Distribution(bounds.to_vec())
    }

    /// Lowercase name used in exports
    pub fn kind_name(&self) -> &'static str {
        match self {
            Aggregation::Count => "count",
            Aggregation::Sum => "sum",
            Aggregation::LastValue => "last_value",
            Aggregation::Distribution(_) => "distribution",
        }
    }
}

/// Binds a measure to an aggregation, keyed by the listed tags
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Unique view name
    pub name: String,
    /// Help text
    pub description: String,
    /// Measure the view aggregates
    pub measure: Measure,
    /// Aggregation applied per tag-value tuple
    pub aggregation: Aggregation,
    /// Tag keys rows are keyed by, in order
    pub tag_keys: Vec<TagKey>,
}

impl View {
    /// Create a view named and described after its measure
    pub fn new(measure: Measure, aggregation: Aggregation, tag_keys: Vec<TagKey>) -> Self {
        Self {
            name: measure.name().to_string(),
            description: measure.description().to_string(),
            measure,
            aggregation,
            tag_keys,
        }
    }

    /// Check the view can be registered
    pub fn validate(&self) -> MetricsResult<()> {
        let invalid = |reason: String| MetricsError::InvalidView {
            name: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("name is empty".into()));
        }

        if let Aggregation::Distribution(bounds) = &self.aggregation {
            if let Some(b) = bounds.iter().find(|b| !b.is_finite()) {
                return Err(invalid(format!("bucket bound {b} is not finite")));
            }
            if let Some(w) = bounds.windows(2).find(|w| w[0] >= w[1]) {
                return Err(invalid(format!(
                    "bucket bounds must increase, found {} before {}",
                    w[0], w[1]
                )));
            }
        }

        let mut seen = HashSet::new();
        for key in &self.tag_keys {
            if !seen.insert(key) {
                return Err(invalid(format!("duplicate tag key {key}")));
            }
        }
        Ok(())
    }
}
