//! Store behaviour under concurrent recording

use pipemon_metrics::{
    Aggregation, Attachments, Measure, Metrics, MetricsSnapshot, Recorder, RowData, TagKey,
    TagSet, Unit, View,
};

const VIEW: &str = "pipelinerun/durations/duration/histogram";

fn store() -> (Metrics, Measure) {
    let metrics = Metrics::new();
    let measure = Measure::new(VIEW, "pipeline durations", Unit::Seconds);
    metrics
        .register_view(View::new(
            measure.clone(),
            Aggregation::distribution(&[1.0, 10.0, 100.0]),
            vec![TagKey::new("pipeline")],
        ))
        .unwrap();
    (metrics, measure)
}

fn pipeline(name: &str) -> TagSet {
    [(TagKey::new("pipeline"), name.to_string())].into_iter().collect()
}

// ==================== Concurrency ====================

#[test]
fn concurrent_records_are_all_counted() {
    let (metrics, measure) = store();
    let none = Attachments::new();

    std::thread::scope(|s| {
        for t in 0..8 {
            let (metrics, measure, none) = (&metrics, &measure, &none);
            s.spawn(move || {
                let tags = pipeline(if t % 2 == 0 { "build" } else { "deploy" });
                for _ in 0..250 {
                    metrics.record(&tags, &[measure.m(2.0)], none);
                }
            });
        }
    });

    for name in ["build", "deploy"] {
        match metrics.row(VIEW, &pipeline(name)) {
            Some(RowData::Distribution(d)) => {
                assert_eq!(d.count, 1000);
                assert_eq!(d.sum, 2000.0);
                assert_eq!(d.buckets, vec![0, 1000, 0, 0]);
            }
            other => panic!("unexpected row {other:?}"),
        }
    }
}

#[test]
fn concurrent_registration_of_same_view() {
    let metrics = Metrics::new();
    let measure = Measure::new("runs", "runs", Unit::Dimensionless);

    std::thread::scope(|s| {
        for _ in 0..4 {
            let (metrics, measure) = (&metrics, &measure);
            s.spawn(move || {
                metrics
                    .register_view(View::new(measure.clone(), Aggregation::Count, vec![]))
                    .unwrap();
            });
        }
    });

    assert_eq!(metrics.all_views().len(), 1);
}

// ==================== Snapshot ====================

#[test]
fn snapshot_rows_are_sorted() {
    let (metrics, measure) = store();
    let none = Attachments::new();
    for name in ["zeta", "alpha", "mid"] {
        metrics.record(&pipeline(name), &[measure.m(5.0)], &none);
    }

    let snapshot = MetricsSnapshot::from_metrics(&metrics);
    let view = snapshot.view(VIEW).unwrap();
    let order: Vec<_> = view.rows.iter().map(|r| r.tags["pipeline"].as_str()).collect();
    assert_eq!(order, vec!["alpha", "mid", "zeta"]);
    assert_eq!(view.aggregation, "distribution");
    assert_eq!(view.unit, "s");
}
