//! Recording scenarios over typed run records
//!
//! Tests cover:
//! - Histogram samples for completed runs
//! - Log output for runs that cannot be recorded
//! - Counter and gauge behaviour through the monitor registry
//! - Concurrent recording

use parking_lot::Mutex;
use pipemon_metrics::{
    Attachments, Measurement, Metrics, MetricsSnapshot, Recorder, RowData, TagKey, TagSet,
};
use pipemon_path::Reflect;
use pipemon_primitives::must_parse_rfc3339;
use pipemon_recorder::{HistogramMetric, Metric, MonitorSet};
use pipemon_types::{
    DurationSpec, HistogramSpec, MonitorSpec, ObjectMeta, PipelineRef, PipelineRun, RunRecord,
    TaskRun,
};
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

// ==================== Helpers ====================

/// Keeps every call instead of aggregating
#[derive(Default)]
struct CapturingRecorder {
    calls: Mutex<Vec<(TagSet, Vec<Measurement>)>>,
}

impl Recorder for CapturingRecorder {
    fn record(&self, tags: &TagSet, measurements: &[Measurement], _attachments: &Attachments) {
        self.calls.lock().push((tags.clone(), measurements.to_vec()));
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().clone();
    String::from_utf8(bytes).unwrap()
}

fn pipeline_run(completion: Option<&str>) -> PipelineRun {
    let mut run = PipelineRun {
        api_version: "tekton.dev/v1beta1".into(),
        kind: "PipelineRun".into(),
        metadata: ObjectMeta {
            name: "build-and-test-x7k2p".into(),
            namespace: "ci".into(),
            uid: "9d7e".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    run.spec.pipeline_ref = Some(PipelineRef {
        name: "build-and-test".into(),
    });
    run.status.start_time = Some(must_parse_rfc3339("2024-01-01T00:00:00Z"));
    run.status.completion_time = completion.map(must_parse_rfc3339);
    run
}

fn histogram(by: &[&str]) -> HistogramMetric {
    HistogramMetric::new(
        HistogramSpec {
            name: "duration".into(),
            by: by.iter().map(|s| s.to_string()).collect(),
            duration: DurationSpec::new(".status.startTime", ".status.completionTime"),
        },
        "pipelinerun",
        "pipeline-durations",
    )
}

// ==================== Histogram ====================

#[test]
fn completed_run_records_ninety_seconds() {
    let metric = histogram(&[".spec.pipelineRef.name"]);
    let recorder = CapturingRecorder::default();

    metric.record(&recorder, &pipeline_run(Some("2024-01-01T00:01:30Z")).reflect());

    let calls = recorder.calls.lock();
    assert_eq!(calls.len(), 1);
    let (tags, measurements) = &calls[0];
    assert_eq!(tags.get(&TagKey::new("spec_pipelineRef_name")), Some("build-and-test"));
    assert_eq!(measurements.len(), 1);
    assert_eq!(measurements[0].value(), 90.0);
    assert_eq!(measurements[0].measure(), metric.measure());
}

#[test]
fn running_run_logs_info_and_records_nothing() {
    let metric = histogram(&[]);
    let recorder = CapturingRecorder::default();

    let logs = capture_logs(|| metric.record(&recorder, &pipeline_run(None).reflect()));

    assert!(recorder.calls.lock().is_empty());
    assert!(logs.contains("INFO"), "{logs}");
    assert!(logs.contains("missing duration timestamp"), "{logs}");
    assert!(logs.contains("monitor=pipeline-durations"), "{logs}");
    assert!(!logs.contains("ERROR"), "{logs}");
}

#[test]
fn unresolvable_label_logs_error_and_records_nothing() {
    let metric = histogram(&[".status.podName"]);
    let recorder = CapturingRecorder::default();

    let run = pipeline_run(Some("2024-01-01T00:01:30Z"));
    let logs = capture_logs(|| metric.record(&recorder, &run.reflect()));

    assert!(recorder.calls.lock().is_empty());
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("invalid tag map"), "{logs}");
    assert!(logs.contains("podName is not found"), "{logs}");
}

#[test]
fn bad_duration_path_logs_error() {
    let metric = HistogramMetric::new(
        HistogramSpec {
            name: "duration".into(),
            by: vec![],
            duration: DurationSpec::new(".status.startTime", ".metadata.name"),
        },
        "pipelinerun",
        "pipeline-durations",
    );
    let recorder = CapturingRecorder::default();

    let run = pipeline_run(Some("2024-01-01T00:01:30Z"));
    let logs = capture_logs(|| metric.record(&recorder, &run.reflect()));

    assert!(recorder.calls.lock().is_empty());
    assert!(logs.contains("error parsing duration"), "{logs}");
    assert!(logs.contains("wrong type"), "{logs}");
}

#[test]
fn clean_is_a_no_op() {
    let metric = histogram(&[]);
    let recorder = CapturingRecorder::default();
    metric.clean(&recorder, &pipeline_run(Some("2024-01-01T00:01:30Z")).reflect());
    assert!(recorder.calls.lock().is_empty());
}

// ==================== Monitors ====================

fn task_run(uid: &str, reason: &str, completion: Option<&str>) -> RunRecord {
    let json = serde_json::json!({
        "kind": "TaskRun",
        "metadata": { "name": uid, "namespace": "ci", "uid": uid },
        "spec": { "taskRef": { "name": "go-test" } },
        "status": {
            "conditions": [{ "type": "Succeeded", "status": "Unknown", "reason": reason }],
            "startTime": "2024-01-01T00:00:00Z",
            "completionTime": completion,
        }
    });
    RunRecord::from_json_value(json).unwrap()
}

fn monitor_set() -> MonitorSet {
    let spec: MonitorSpec = serde_json::from_value(serde_json::json!({
        "name": "tasks",
        "resource": "taskrun",
        "metrics": [
            { "type": "counter", "name": "total", "by": [".metadata.namespace"] },
            { "type": "gauge", "name": "running", "by": [".status.conditions[0].reason"] },
            {
                "type": "histogram",
                "name": "duration",
                "by": [".spec.taskRef.name"],
                "duration": { "from": ".status.startTime", "to": ".status.completionTime" }
            }
        ]
    }))
    .unwrap();
    MonitorSet::new(&[spec]).unwrap()
}

#[test]
fn metric_names_follow_config_order() {
    let set = monitor_set();
    let names: Vec<_> = set.metrics().map(|m| m.metric_name().to_string()).collect();
    assert_eq!(
        names,
        vec![
            "taskrun/tasks/total/counter",
            "taskrun/tasks/running/gauge",
            "taskrun/tasks/duration/histogram",
        ]
    );
}

#[test]
fn monitor_set_drives_all_kinds() {
    let set = monitor_set();
    let metrics = Metrics::new();
    set.register_views(&metrics).unwrap();
    set.register_views(&metrics).unwrap();

    set.record(&metrics, &task_run("a", "Running", None));
    set.record(&metrics, &task_run("b", "Running", None));
    set.record(&metrics, &task_run("a", "Succeeded", Some("2024-01-01T00:00:30Z")));

    let ns: TagSet = [(TagKey::new("metadata_namespace"), "ci".to_string())].into_iter().collect();
    assert_eq!(
        metrics.row("taskrun/tasks/total/counter", &ns),
        Some(RowData::Count { value: 2 })
    );

    let reason = |r: &str| -> TagSet {
        [(TagKey::new("status_conditions_0_reason"), r.to_string())].into_iter().collect()
    };
    assert_eq!(
        metrics.row("taskrun/tasks/running/gauge", &reason("Running")),
        Some(RowData::LastValue { value: 1.0 })
    );
    assert_eq!(
        metrics.row("taskrun/tasks/running/gauge", &reason("Succeeded")),
        Some(RowData::LastValue { value: 1.0 })
    );

    let task: TagSet = [(TagKey::new("spec_taskRef_name"), "go-test".to_string())].into_iter().collect();
    match metrics.row("taskrun/tasks/duration/histogram", &task) {
        Some(RowData::Distribution(d)) => {
            assert_eq!(d.count, 1);
            assert_eq!(d.sum, 30.0);
        }
        other => panic!("unexpected row {other:?}"),
    }

    set.clean(&metrics, &task_run("a", "Succeeded", Some("2024-01-01T00:00:30Z")));
    assert_eq!(
        metrics.row("taskrun/tasks/running/gauge", &reason("Succeeded")),
        Some(RowData::LastValue { value: 0.0 })
    );

    let snapshot = MetricsSnapshot::from_metrics(&metrics);
    assert_eq!(snapshot.views.len(), 3);
}

#[test]
fn typed_taskrun_routes_to_taskrun_monitors() {
    let set = monitor_set();
    let metrics = Metrics::new();
    set.register_views(&metrics).unwrap();

    let run = TaskRun {
        kind: "TaskRun".into(),
        metadata: ObjectMeta {
            name: "t".into(),
            namespace: "ci".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    let logs = capture_logs(|| {
        assert_eq!(set.record(&metrics, &RunRecord::TaskRun(Box::new(run))), 1);
    });
    // no conditions and no task ref: gauge and histogram cannot build labels
    assert!(logs.contains("invalid tag map"), "{logs}");
    assert_eq!(metrics.rows("taskrun/tasks/total/counter").unwrap().len(), 1);
}

// ==================== Concurrency ====================

#[test]
fn concurrent_records_for_distinct_runs() {
    let set = monitor_set();
    let metrics = Metrics::new();
    set.register_views(&metrics).unwrap();

    std::thread::scope(|s| {
        for t in 0..4 {
            let (set, metrics) = (&set, &metrics);
            s.spawn(move || {
                for i in 0..50 {
                    let uid = format!("run-{t}-{i}");
                    set.record(metrics, &task_run(&uid, "Running", None));
                }
            });
        }
    });

    let ns: TagSet = [(TagKey::new("metadata_namespace"), "ci".to_string())].into_iter().collect();
    assert_eq!(
        metrics.row("taskrun/tasks/total/counter", &ns),
        Some(RowData::Count { value: 200 })
    );
    let running: TagSet = [(TagKey::new("status_conditions_0_reason"), "Running".to_string())]
        .into_iter()
        .collect();
    assert_eq!(
        metrics.row("taskrun/tasks/running/gauge", &running),
        Some(RowData::LastValue { value: 200.0 })
    );
}
