//! Metric names
//!
//! Names have the form `<resource>/<monitor>/<metric>/<kind>`. `%` and `/`
//! are percent-escaped inside each component so distinct tuples never
//! collide.

use pipemon_types::MetricKind;

fn escape(component: &str) -> String {
    component.replace('%', "%25").replace('/', "%2F")
}

/// Name of a metric of `kind`
pub fn metric_name(kind: MetricKind, resource: &str, monitor: &str, metric: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        escape(resource),
        escape(monitor),
        escape(metric),
        kind.as_str()
    )
}

/// Name of a histogram metric
pub fn histogram_metric(resource: &str, monitor: &str, metric: &str) -> String {
    metric_name(MetricKind::Histogram, resource, monitor, metric)
}

/// Name of a counter metric
pub fn counter_metric(resource: &str, monitor: &str, metric: &str) -> String {
    metric_name(MetricKind::Counter, resource, monitor, metric)
}

/// Name of a gauge metric
pub fn gauge_metric(resource: &str, monitor: &str, metric: &str) -> String {
    metric_name(MetricKind::Gauge, resource, monitor, metric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(
            histogram_metric("taskrun", "test-durations", "duration"),
            "taskrun/test-durations/duration/histogram"
        );
        assert_eq!(counter_metric("pipelinerun", "m", "total"), "pipelinerun/m/total/counter");
        assert_eq!(gauge_metric("pipelinerun", "m", "running"), "pipelinerun/m/running/gauge");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(histogram_metric("a/b", "c", "d"), "a%2Fb/c/d/histogram");
        assert_ne!(histogram_metric("a/b", "c", "d"), histogram_metric("a", "b/c", "d"));
        assert_eq!(histogram_metric("100%", "m", "x"), "100%25/m/x/histogram");
        assert_ne!(histogram_metric("%2F", "m", "x"), histogram_metric("/", "m", "x"));
    }
}
