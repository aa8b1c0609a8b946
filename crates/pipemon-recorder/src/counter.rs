//! Run counter

use crate::identity::run_identity;
use crate::metric::Metric;
use crate::naming;
use crate::tags::{tag_set_from_by, view_tags};
use dashmap::DashSet;
use pipemon_metrics::{Aggregation, Attachments, Measure, Recorder, Unit, View};
use pipemon_path::Value;
use pipemon_types::{CounterSpec, MetricKind};

/// Counts distinct runs per label set.
///
/// A run is counted the first time it is observed; later observations of
/// the same run are ignored until it is cleaned.
#[derive(Debug)]
pub struct CounterMetric {
    resource: String,
    monitor: String,
    spec: CounterSpec,
    name: String,
    measure: Measure,
    view: View,
    seen: DashSet<String>,
}

impl CounterMetric {
    /// Create the metric for `spec` in monitor `monitor` of `resource`
    pub fn new(spec: CounterSpec, resource: &str, monitor: &str) -> Self {
        let name = naming::counter_metric(resource, monitor, &spec.name);
        let measure = Measure::new(
            name.clone(),
            format!("count of {resource} runs for monitor {monitor}/{}", spec.name),
            Unit::Dimensionless,
        );
        let view = View::new(measure.clone(), Aggregation::Count, view_tags(&spec.by));
        Self {
            resource: resource.to_string(),
            monitor: monitor.to_string(),
            spec,
            name,
            measure,
            view,
            seen: DashSet::new(),
        }
    }

    /// Number of runs currently remembered
    pub fn tracked(&self) -> usize {
        self.seen.len()
    }
}

impl Metric for CounterMetric {
    fn metric_name(&self) -> &str {
        &self.name
    }

    fn metric_type(&self) -> MetricKind {
        MetricKind::Counter
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

        let id = match run_identity(input) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "error recording value, no run identity");
                return;
            }
        };
        let tags = match tag_set_from_by(&self.spec.by, input) {
            Ok(tags) => tags,
            Err(e) => {
                tracing::error!(error = %e, "error recording value, invalid tag map");
                return;
            }
        };

        if !self.seen.insert(id) {
            tracing::debug!("run already counted");
            return;
        }
        recorder.record(&tags, &[self.measure.m(1.0)], &Attachments::new());
    }

    fn clean(&self, _recorder: &dyn Recorder, input: &Value) {
        match run_identity(input) {
            Ok(id) => {
                self.seen.remove(&id);
            }
            Err(e) => tracing::error!(
                monitor = %self.monitor,
                metric = %self.spec.name,
                error = %e,
                "error cleaning run"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipemon_metrics::{Metrics, RowData, TagSet};

    fn run(uid: &str) -> Value {
        Value::record([(
            "metadata",
            Value::record([
                ("uid", Value::String(uid.into())),
                ("name", Value::String("r".into())),
            ]),
        )])
    }

    #[test]
    fn test_counts_each_run_once() {
        let counter = CounterMetric::new(
            CounterSpec {
                name: "total".into(),
                by: vec![],
            },
            "taskrun",
            "m",
        );
        let metrics = Metrics::new();
        metrics.register_view(counter.view().clone()).unwrap();

        counter.record(&metrics, &run("a"));
        counter.record(&metrics, &run("a"));
        counter.record(&metrics, &run("b"));
        assert_eq!(counter.tracked(), 2);
        assert_eq!(
            metrics.row(counter.metric_name(), &TagSet::new()),
            Some(RowData::Count { value: 2 })
        );

        counter.clean(&metrics, &run("a"));
        assert_eq!(counter.tracked(), 1);
        counter.record(&metrics, &run("a"));
        assert_eq!(
            metrics.row(counter.metric_name(), &TagSet::new()),
            Some(RowData::Count { value: 3 })
        );
    }

    #[test]
    fn test_tag_failure_does_not_mark_seen() {
        let counter = CounterMetric::new(
            CounterSpec {
                name: "total".into(),
                by: vec![".spec.pipelineRef.name".into()],
            },
            "pipelinerun",
            "m",
        );
        let metrics = Metrics::new();
        counter.record(&metrics, &run("a"));
        assert_eq!(counter.tracked(), 0);
    }
}
