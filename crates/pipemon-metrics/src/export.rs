//! Metrics export and snapshot functionality

use crate::collector::Metrics;
use crate::tags::TagSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Snapshot of all views at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Views sorted by name
    pub views: Vec<ViewSnapshot>,
}

/// One view and its rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    /// View name
    pub name: String,
    /// Help text
    pub description: String,
    /// Unit symbol of the measure
    pub unit: String,
    /// Aggregation name
    pub aggregation: String,
    /// Tag keys in view order
    pub tag_keys: Vec<String>,
    /// Rows sorted by tag values
    pub rows: Vec<RowSnapshot>,
}

/// One aggregated row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSnapshot {
    /// Tag values of the row
    pub tags: BTreeMap<String, String>,
    /// Aggregated data
    pub data: RowData,
}

/// Aggregated data of a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowData {
    /// Number of measurements
    Count {
        /// Count
        value: u64,
    },
    /// Sum of measurements
    Sum {
        /// Sum
        value: f64,
    },
    /// Latest measurement
    LastValue {
        /// Latest value
        value: f64,
    },
    /// Bucketed distribution
    Distribution(DistributionData),
}

/// Distribution summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionData {
    /// Number of observations
    pub count: u64,
    /// Sum of observations
    pub sum: f64,
    /// Mean observation
    pub mean: f64,
    /// Smallest observation
    pub min: Option<f64>,
    /// Largest observation
    pub max: Option<f64>,
    /// Upper bucket bounds
    pub bounds: Vec<f64>,
    /// Per-bucket counts, one more than `bounds`
    pub buckets: Vec<u64>,
}

impl MetricsSnapshot {
    /// Create a snapshot from a Metrics instance
    pub fn from_metrics(metrics: &Metrics) -> Self {
        let mut views: Vec<ViewSnapshot> = metrics
            .all_views()
            .into_iter()
            .map(|(view, rows)| {
                let mut rows: Vec<RowSnapshot> = rows
                    .into_iter()
                    .map(|(tags, data)| RowSnapshot {
                        tags: tag_map(&tags),
                        data,
                    })
                    .collect();
                rows.sort_by(|a, b| a.tags.cmp(&b.tags));
                ViewSnapshot {
                    name: view.name,
                    description: view.description,
                    unit: view.measure.unit().as_str().to_string(),
                    aggregation: view.aggregation.kind_name().to_string(),
                    tag_keys: view.tag_keys.iter().map(|k| k.name().to_string()).collect(),
                    rows,
                }
            })
            .collect();
        views.sort_by(|a, b| a.name.cmp(&b.name));
        Self { views }
    }

    /// Find a view by name
    pub fn view(&self, name: &str) -> Option<&ViewSnapshot> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Export snapshot as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export snapshot as compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Export snapshot in the Prometheus text exposition format
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();
        for view in &self.views {
            let name = prometheus_name(&view.name);
            let kind = match view.aggregation.as_str() {
                "distribution" => "histogram",
                "last_value" => "gauge",
                _ => "counter",
            };
            // writing to a String cannot fail
            let _ = writeln!(out, "# HELP {name} {}", escape_help(&view.description));
            let _ = writeln!(out, "# TYPE {name} {kind}");

            for row in &view.rows {
                let labels: Vec<(String, String)> = view
                    .tag_keys
                    .iter()
                    .map(|k| {
                        let value = row.tags.get(k).cloned().unwrap_or_default();
                        (prometheus_name(k), value)
                    })
                    .collect();

                match &row.data {
                    RowData::Count { value } => {
                        let _ = writeln!(out, "{name}{} {value}", label_block(&labels, None));
                    }
                    RowData::Sum { value } | RowData::LastValue { value } => {
                        let _ = writeln!(out, "{name}{} {}", label_block(&labels, None), number(*value));
                    }
                    RowData::Distribution(d) => {
                        let mut cumulative = 0;
                        for (i, count) in d.buckets.iter().enumerate() {
                            cumulative += count;
                            let le = d.bounds.get(i).map_or_else(|| "+Inf".to_string(), |b| number(*b));
                            let _ = writeln!(
                                out,
                                "{name}_bucket{} {cumulative}",
                                label_block(&labels, Some(&le))
                            );
                        }
                        let block = label_block(&labels, None);
                        let _ = writeln!(out, "{name}_sum{block} {}", number(d.sum));
                        let _ = writeln!(out, "{name}_count{block} {}", d.count);
                    }
                }
            }
        }
        out
    }
}

fn tag_map(tags: &TagSet) -> BTreeMap<String, String> {
    tags.iter()
        .map(|(k, v)| (k.name().to_string(), v.to_string()))
        .collect()
}

/// Replace characters outside `[a-zA-Z0-9_:]`, never start with a digit
fn prometheus_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == ':' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn label_block(labels: &[(String, String)], le: Option<&str>) -> String {
    let mut parts: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
        .collect();
    if let Some(le) = le {
        parts.push(format!("le=\"{le}\""));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", parts.join(","))
    }
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn escape_help(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\n', "\\n")
}

fn number(value: f64) -> String {
    match value {
        v if v == f64::INFINITY => "+Inf".to_string(),
        v if v == f64::NEG_INFINITY => "-Inf".to_string(),
        v => v.to_string(),
    }
}
