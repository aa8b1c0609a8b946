//! Live run gauge

use crate::identity::run_identity;
use crate::metric::Metric;
use crate::naming;
use crate::tags::{tag_set_from_by, view_tags};
use parking_lot::Mutex;
use pipemon_metrics::{Aggregation, Attachments, Measure, Recorder, TagSet, Unit, View};
use pipemon_path::Value;
use pipemon_types::{GaugeSpec, MetricKind};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct GaugeState {
    /// Label set each live run belongs to
    runs: HashMap<String, TagSet>,
    /// Live runs per label set
    counts: HashMap<TagSet, u64>,
}

impl GaugeState {
    fn increment(&mut self, tags: &TagSet) -> u64 {
        let count = self.counts.entry(tags.clone()).or_insert(0);
        *count += 1;
        *count
    }

    fn decrement(&mut self, tags: &TagSet) -> u64 {
        let count = self.counts.get(tags).copied().unwrap_or(0).saturating_sub(1);
        if count == 0 {
            self.counts.remove(tags);
        } else {
            self.counts.insert(tags.clone(), count);
        }
        count
    }
}

/// Number of live runs per label set.
///
/// A run moves between label sets when its labels change and leaves the
/// gauge when it is cleaned.
#[derive(Debug)]
pub struct GaugeMetric {
    resource: String,
    monitor: String,
    spec: GaugeSpec,
    name: String,
    measure: Measure,
    view: View,
    state: Mutex<GaugeState>,
}

impl GaugeMetric {
    /// Create the metric for `spec` in monitor `monitor` of `resource`
    pub fn new(spec: GaugeSpec, resource: &str, monitor: &str) -> Self {
        let name = naming::gauge_metric(resource, monitor, &spec.name);
        let measure = Measure::new(
            name.clone(),
            format!("live {resource} runs for monitor {monitor}/{}", spec.name),
            Unit::Dimensionless,
        );
        let view = View::new(measure.clone(), Aggregation::LastValue, view_tags(&spec.by));
        Self {
            resource: resource.to_string(),
            monitor: monitor.to_string(),
            spec,
            name,
            measure,
            view,
            state: Mutex::new(GaugeState::default()),
        }
    }

    /// Live runs with the given labels
    pub fn count(&self, tags: &TagSet) -> u64 {
        self.state.lock().counts.get(tags).copied().unwrap_or(0)
    }

    fn emit(&self, recorder: &dyn Recorder, tags: &TagSet, count: u64) {
        recorder.record(tags, &[self.measure.m(count as f64)], &Attachments::new());
    }
}

impl Metric for GaugeMetric {
    fn metric_name(&self) -> &str {
        &self.name
    }

    fn metric_type(&self) -> MetricKind {
        MetricKind::Gauge
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

        // emit under the lock so last-value rows follow state order
        let mut state = self.state.lock();
        match state.runs.insert(id, tags.clone()) {
            Some(previous) if previous == tags => {}
            Some(previous) => {
                let left = state.decrement(&previous);
                self.emit(recorder, &previous, left);
                let count = state.increment(&tags);
                self.emit(recorder, &tags, count);
            }
            None => {
                let count = state.increment(&tags);
                self.emit(recorder, &tags, count);
            }
        }
    }

    fn clean(&self, recorder: &dyn Recorder, input: &Value) {
        let span = tracing::info_span!(
            "clean",
            resource = %self.resource,
            monitor = %self.monitor,
            metric = %self.spec.name
        );
        let _guard = span.enter();

        let id = match run_identity(input) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "error cleaning run");
                return;
            }
        };

        let mut state = self.state.lock();
        if let Some(tags) = state.runs.remove(&id) {
            let left = state.decrement(&tags);
            self.emit(recorder, &tags, left);
        }
    }
}
