//! Monitor registry

use crate::error::{RecordError, RecordResult};
use crate::metric::{Metric, MonitorMetric};
use pipemon_metrics::{Metrics, MetricsResult, Recorder};
use pipemon_path::{Reflect, Value};
use pipemon_types::{MonitorSpec, RunRecord};
use std::collections::HashSet;

/// The metrics of one monitor, all observing the same resource kind
#[derive(Debug)]
pub struct Monitor {
    name: String,
    resource: String,
    metrics: Vec<MonitorMetric>,
}

impl Monitor {
    /// Build every metric of `spec`
    pub fn new(spec: &MonitorSpec) -> RecordResult<Self> {
        let mut names = HashSet::new();
        let mut metrics = Vec::with_capacity(spec.metrics.len());
        for metric in &spec.metrics {
            if !names.insert((metric.kind(), metric.name())) {
                return Err(RecordError::DuplicateMetric {
                    monitor: spec.name.clone(),
                    kind: metric.kind().as_str(),
                    metric: metric.name().to_string(),
                });
            }
            metrics.push(MonitorMetric::from_spec(metric, &spec.resource, &spec.name));
        }
        Ok(Self {
            name: spec.name.clone(),
            resource: spec.resource.to_ascii_lowercase(),
            metrics,
        })
    }

    /// Monitor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercased resource kind
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Metrics of the monitor
    pub fn metrics(&self) -> &[MonitorMetric] {
        &self.metrics
    }

    /// Check whether records of `resource` are observed
    pub fn applies_to(&self, resource: &str) -> bool {
        self.resource.eq_ignore_ascii_case(resource)
    }

    /// Register the view of every metric
    pub fn register_views(&self, metrics: &Metrics) -> MetricsResult<()> {
        for metric in &self.metrics {
            metrics.register_view(metric.view().clone())?;
        }
        Ok(())
    }

    /// Observe a record with every metric
    pub fn record<R: Reflect + ?Sized>(&self, recorder: &dyn Recorder, record: &R) {
        self.record_value(recorder, &record.reflect());
    }

    /// Forget a record in every metric
    pub fn clean<R: Reflect + ?Sized>(&self, recorder: &dyn Recorder, record: &R) {
        self.clean_value(recorder, &record.reflect());
    }

    /// Observe an already reflected record
    pub fn record_value(&self, recorder: &dyn Recorder, value: &Value) {
        for metric in &self.metrics {
            metric.record(recorder, value);
        }
    }

    /// Forget an already reflected record
    pub fn clean_value(&self, recorder: &dyn Recorder, value: &Value) {
        for metric in &self.metrics {
            metric.clean(recorder, value);
        }
    }
}

/// All monitors of a configuration
#[derive(Debug, Default)]
pub struct MonitorSet {
    monitors: Vec<Monitor>,
}

impl MonitorSet {
    /// Build every monitor, rejecting duplicate names
    pub fn new(specs: &[MonitorSpec]) -> RecordResult<Self> {
        let mut names = HashSet::new();
        let mut monitors = Vec::with_capacity(specs.len());
        for spec in specs {
            if !names.insert(spec.name.as_str()) {
                return Err(RecordError::DuplicateMonitor(spec.name.clone()));
            }
            monitors.push(Monitor::new(spec)?);
        }
        tracing::info!(monitors = monitors.len(), "monitors loaded");
        Ok(Self { monitors })
    }

    /// Monitors in configuration order
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// Number of monitors
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Every metric of every monitor
    pub fn metrics(&self) -> impl Iterator<Item = &MonitorMetric> {
        self.monitors.iter().flat_map(|m| m.metrics().iter())
    }

    /// Register the views of every monitor
    pub fn register_views(&self, metrics: &Metrics) -> MetricsResult<()> {
        for monitor in &self.monitors {
            monitor.register_views(metrics)?;
        }
        Ok(())
    }

    /// Feed a run to the monitors observing its kind.
    ///
    /// Returns the number of monitors that saw it.
    pub fn record(&self, recorder: &dyn Recorder, run: &RunRecord) -> usize {
        self.dispatch(run, |monitor, value| monitor.record_value(recorder, value))
    }

    /// Clean a run from the monitors observing its kind
    pub fn clean(&self, recorder: &dyn Recorder, run: &RunRecord) -> usize {
        self.dispatch(run, |monitor, value| monitor.clean_value(recorder, value))
    }

    fn dispatch(&self, run: &RunRecord, f: impl Fn(&Monitor, &Value)) -> usize {
        let resource = run.resource();
        let mut matched = self
            .monitors
            .iter()
            .filter(|m| m.applies_to(&resource))
            .peekable();
        if matched.peek().is_none() {
            tracing::debug!(kind = run.kind(), run = %run.key(), "no monitor for run");
            return 0;
        }

        let value = run.reflect();
        let mut count = 0;
        for monitor in matched {
            f(monitor, &value);
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipemon_types::{CounterSpec, GaugeSpec, MetricSpec};

    fn spec(name: &str, resource: &str) -> MonitorSpec {
        MonitorSpec {
            name: name.into(),
            resource: resource.into(),
            metrics: vec![
                MetricSpec::Counter(CounterSpec {
                    name: "total".into(),
                    by: vec![],
                }),
                MetricSpec::Gauge(GaugeSpec {
                    name: "total".into(),
                    by: vec![],
                }),
            ],
        }
    }

    #[test]
    fn test_monitor_metrics() {
        let monitor = Monitor::new(&spec("runs", "TaskRun")).unwrap();
        assert_eq!(monitor.metrics().len(), 2);
        assert_eq!(monitor.resource(), "taskrun");
        assert!(monitor.applies_to("taskrun"));
        assert!(!monitor.applies_to("pipelinerun"));
    }

    #[test]
    fn test_duplicate_metric_rejected() {
        let mut s = spec("runs", "taskrun");
        s.metrics.push(s.metrics[0].clone());
        assert!(matches!(
            Monitor::new(&s),
            Err(RecordError::DuplicateMetric { kind: "counter", .. })
        ));
    }

    #[test]
    fn test_duplicate_monitor_rejected() {
        let specs = [spec("runs", "taskrun"), spec("runs", "pipelinerun")];
        assert_eq!(
            MonitorSet::new(&specs).unwrap_err(),
            RecordError::DuplicateMonitor("runs".into())
        );
    }

    #[test]
    fn test_routing_by_resource() {
        let set = MonitorSet::new(&[spec("tasks", "taskrun"), spec("pipelines", "pipelinerun")]).unwrap();
        let metrics = Metrics::new();
        set.register_views(&metrics).unwrap();
        assert_eq!(set.metrics().count(), 4);

        let run = RunRecord::from_json(r#"{"kind":"TaskRun","metadata":{"name":"t","namespace":"ci"}}"#).unwrap();
        assert_eq!(set.record(&metrics, &run), 1);

        let other = RunRecord::from_json(r#"{"kind":"CustomRun","metadata":{"name":"c"}}"#).unwrap();
        assert_eq!(set.record(&metrics, &other), 0);
    }
}
