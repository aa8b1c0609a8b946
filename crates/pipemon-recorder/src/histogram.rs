//! Duration histogram

use crate::duration::parse_duration;
use crate::metric::Metric;
use crate::naming;
use crate::tags::{tag_set_from_by, view_tags};
use pipemon_metrics::{Aggregation, Attachments, Measure, Recorder, Unit, View};
use pipemon_path::Value;
use pipemon_types::{HistogramSpec, MetricKind};

/// Bucket bounds in seconds
pub const DURATION_BUCKETS: [f64; 15] = [
    0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0,
    10000.0,
];

/// Histogram of the seconds between two timestamps of a record.
///
/// Holds no state between calls.
#[derive(Debug)]
pub struct HistogramMetric {
    resource: String,
    monitor: String,
    spec: HistogramSpec,
    name: String,
    measure: Measure,
    view: View,
}

impl HistogramMetric {
    /// Create the metric for `spec` in monitor `monitor` of `resource`
    pub fn new(spec: HistogramSpec, resource: &str, monitor: &str) -> Self {
        let name = naming::histogram_metric(resource, monitor, &spec.name);
        let measure = Measure::new(
            name.clone(),
            format!(
                "histogram samples in seconds for {resource} monitor {monitor}/{}",
                spec.name
            ),
            Unit::Seconds,
        );
        let view = View::new(
            measure.clone(),
            Aggregation::distribution(&DURATION_BUCKETS),
            view_tags(&spec.by),
        );
        Self {
            resource: resource.to_string(),
            monitor: monitor.to_string(),
            spec,
            name,
            measure,
            view,
        }
    }

    /// Configuration the metric was built from
    pub fn spec(&self) -> &HistogramSpec {
        &self.spec
    }

    /// Measure samples are recorded against
    pub fn measure(&self) -> &Measure {
        &self.measure
    }
}

impl Metric for HistogramMetric {
    fn metric_name(&self) -> &str {
        &self.name
    }

    fn metric_type(&self) -> MetricKind {
        MetricKind::Histogram
    }

    fn monitor_name(&self) -> &str {
        &self.monitor
    }

    fn view(&self) -> &View {
        &self.view
    }

    fn record(&self, recorder: &dyn Recorder, input: &Value) {
        let span = tracing::info_span!(
            "record",
            resource = %self.resource,
            monitor = %self.monitor,
            metric = %self.spec.name
        );
        let _guard = span.enter();

        let tags = match tag_set_from_by(&self.spec.by, input) {
            Ok(tags) => tags,
            Err(e) => {
                tracing::error!(error = %e, "error recording value, invalid tag map");
                return;
            }
        };

        let bounds = match parse_duration(&self.spec.duration, input) {
            Ok(bounds) => bounds,
            Err(e) => {
                tracing::error!(error = %e, "error parsing duration");
                return;
            }
        };

        let Some(seconds) = bounds.elapsed_seconds() else {
            tracing::info!("missing duration timestamp");
            return;
        };

        recorder.record(&tags, &[self.measure.m(seconds)], &Attachments::new());
    }

    fn clean(&self, _recorder: &dyn Recorder, _input: &Value) {}
}
