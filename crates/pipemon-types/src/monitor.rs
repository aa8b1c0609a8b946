//! Monitor configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// A set of metrics extracted from one kind of run resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSpec {
    /// Monitor name, unique within a configuration
    pub name: String,
    /// Lowercased resource kind the monitor observes, e.g. `pipelinerun`
    pub resource: String,
    /// Metrics to extract
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
}

/// Metric configuration, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetricSpec {
    /// Distinct runs per label set
    Counter(CounterSpec),
    /// Live runs per label set
    Gauge(GaugeSpec),
    /// Run durations per label set
    Histogram(HistogramSpec),
}

impl MetricSpec {
    /// Metric name
    pub fn name(&self) -> &str {
        match self {
            MetricSpec::Counter(spec) => &spec.name,
            MetricSpec::Gauge(spec) => &spec.name,
            MetricSpec::Histogram(spec) => &spec.name,
        }
    }

    /// Label path expressions
    pub fn by(&self) -> &[String] {
        match self {
            MetricSpec::Counter(spec) => &spec.by,
            MetricSpec::Gauge(spec) => &spec.by,
            MetricSpec::Histogram(spec) => &spec.by,
        }
    }

    /// Metric kind
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricSpec::Counter(_) => MetricKind::Counter,
            MetricSpec::Gauge(_) => MetricKind::Gauge,
            MetricSpec::Histogram(_) => MetricKind::Histogram,
        }
    }
}

/// Counter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSpec {
    /// Metric name
    pub name: String,
    /// Label path expressions
    #[serde(default)]
    pub by: Vec<String>,
}

/// Gauge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeSpec {
    /// Metric name
    pub name: String,
    /// Label path expressions
    #[serde(default)]
    pub by: Vec<String>,
}

/// Histogram configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramSpec {
    /// Metric name
    pub name: String,
    /// Label path expressions
    #[serde(default)]
    pub by: Vec<String>,
    /// Where the observed interval starts and ends
    pub duration: DurationSpec,
}

/// Pair of timestamp path expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSpec {
    /// Start of the interval, e.g. `.status.startTime`
    pub from: String,
    /// End of the interval, e.g. `.status.completionTime`
    pub to: String,
}

impl DurationSpec {
    /// Create a duration spec
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Metric kinds sharing the monitor metric contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Counter
    Counter,
    /// Gauge
    Gauge,
    /// Histogram
    Histogram,
}

impl MetricKind {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_from_toml() {
        let text = r#"
            name = "pipeline-durations"
            resource = "pipelinerun"

            [[metrics]]
            type = "histogram"
            name = "duration"
            by = [".spec.pipelineRef.name"]
            duration = { from = ".status.startTime", to = ".status.completionTime" }

            [[metrics]]
            type = "counter"
            name = "total"
        "#;
        let monitor: MonitorSpec = toml::from_str(text).unwrap();
        assert_eq!(monitor.metrics.len(), 2);

        let histogram = &monitor.metrics[0];
        assert_eq!(histogram.kind(), MetricKind::Histogram);
        assert_eq!(histogram.name(), "duration");
        assert_eq!(histogram.by(), [".spec.pipelineRef.name".to_string()]);
        match histogram {
            MetricSpec::Histogram(spec) => {
                assert_eq!(spec.duration, DurationSpec::new(".status.startTime", ".status.completionTime"))
            }
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!(monitor.metrics[1].kind(), MetricKind::Counter);
        assert!(monitor.metrics[1].by().is_empty());
    }

    #[test]
    fn test_histogram_requires_duration() {
        let text = r#"
            name = "m"
            resource = "taskrun"
            [[metrics]]
            type = "histogram"
            name = "duration"
        "#;
        assert!(toml::from_str::<MonitorSpec>(text).is_err());
    }

    #[test]
    fn test_unknown_metric_type() {
        let text = r#"
            name = "m"
            resource = "taskrun"
            [[metrics]]
            type = "summary"
            name = "duration"
        "#;
        assert!(toml::from_str::<MonitorSpec>(text).is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MetricKind::Histogram.to_string(), "histogram");
        assert_eq!(MetricKind::Gauge.as_str(), "gauge");
    }
}
