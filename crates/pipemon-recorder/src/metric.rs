//! Common metric contract

use crate::counter::CounterMetric;
use crate::gauge::GaugeMetric;
use crate::histogram::HistogramMetric;
use pipemon_metrics::{Recorder, View};
use pipemon_path::Value;
use pipemon_types::{MetricKind, MetricSpec};

/// A metric extracted from run records
pub trait Metric {
    /// Full metric name, also the view and measure name
    fn metric_name(&self) -> &str;

    /// Metric kind
    fn metric_type(&self) -> MetricKind;

    /// Owning monitor
    fn monitor_name(&self) -> &str;

    /// View to register before recording
    fn view(&self) -> &View;

    /// Observe a reflected record
    fn record(&self, recorder: &dyn Recorder, input: &Value);

    /// Forget a reflected record that went away
    fn clean(&self, recorder: &dyn Recorder, input: &Value);
}

/// Any metric kind a monitor can hold
#[derive(Debug)]
pub enum MonitorMetric {
    /// Distinct runs
    Counter(CounterMetric),
    /// Live runs
    Gauge(GaugeMetric),
    /// Run durations
    Histogram(HistogramMetric),
}

impl MonitorMetric {
    /// Build the metric described by `spec`
    pub fn from_spec(spec: &MetricSpec, resource: &str, monitor: &str) -> Self {
        match spec {
            MetricSpec::Counter(spec) => {
                MonitorMetric::Counter(CounterMetric::new(spec.clone(), resource, monitor))
            }
            MetricSpec::Gauge(spec) => {
                MonitorMetric::Gauge(GaugeMetric::new(spec.clone(), resource, monitor))
            }
            MetricSpec::Histogram(spec) => {
                MonitorMetric::Histogram(HistogramMetric::new(spec.clone(), resource, monitor))
            }
        }
    }

    fn inner(&self) -> &dyn Metric {
        match self {
            MonitorMetric::Counter(m) => m,
            MonitorMetric::Gauge(m) => m,
            MonitorMetric::Histogram(m) => m,
        }
    }
}

impl Metric for MonitorMetric {
    fn metric_name(&self) -> &str {
        self.inner().metric_name()
    }

    fn metric_type(&self) -> MetricKind {
        self.inner().metric_type()
    }

    fn monitor_name(&self) -> &str {
        self.inner().monitor_name()
    }

    fn view(&self) -> &View {
        self.inner().view()
    }

    fn record(&self, recorder: &dyn Recorder, input: &Value) {
        self.inner().record(recorder, input)
    }

    fn clean(&self, recorder: &dyn Recorder, input: &Value) {
        self.inner().clean(recorder, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipemon_types::{CounterSpec, DurationSpec, HistogramSpec};

    #[test]
    fn test_from_spec_dispatch() {
        let spec = MetricSpec::Histogram(HistogramSpec {
            name: "duration".into(),
            by: vec![],
            duration: DurationSpec::new(".status.startTime", ".status.completionTime"),
        });
        let metric = MonitorMetric::from_spec(&spec, "taskrun", "durations");
        assert!(matches!(metric, MonitorMetric::Histogram(_)));
        assert_eq!(metric.metric_type(), MetricKind::Histogram);
        assert_eq!(metric.metric_name(), "taskrun/durations/duration/histogram");
        assert_eq!(metric.monitor_name(), "durations");
        assert_eq!(metric.view().name, metric.metric_name());

        let spec = MetricSpec::Counter(CounterSpec {
            name: "total".into(),
            by: vec![".metadata.namespace".into()],
        });
        let metric = MonitorMetric::from_spec(&spec, "taskrun", "durations");
        assert_eq!(metric.metric_type().as_str(), "counter");
        assert_eq!(metric.view().tag_keys.len(), 1);
    }
}
