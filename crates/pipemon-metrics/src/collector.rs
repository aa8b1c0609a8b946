//! View registry and aggregation store

use crate::error::{MetricsError, MetricsResult};
use crate::export::{DistributionData, RowData};
use crate::histogram::Histogram;
use crate::measure::Measurement;
use crate::tags::TagSet;
use crate::view::{Aggregation, View};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Extra key/value data passed along with a recording
pub type Attachments = BTreeMap<String, String>;

/// Sink for measurements
pub trait Recorder: Send + Sync {
    /// Record measurements under a tag set
    fn record(&self, tags: &TagSet, measurements: &[Measurement], attachments: &Attachments);
}

/// Aggregated state for one tag-value tuple
#[derive(Debug)]
enum Row {
    Count(AtomicU64),
    Sum(AtomicU64),
    LastValue(AtomicU64),
    Distribution(Histogram),
}

impl Row {
    fn new(aggregation: &Aggregation) -> Self {
        match aggregation {
            Aggregation::Count => Row::Count(AtomicU64::new(0)),
            Aggregation::Sum => Row::Sum(AtomicU64::new(0f64.to_bits())),
            Aggregation::LastValue => Row::LastValue(AtomicU64::new(0f64.to_bits())),
            Aggregation::Distribution(bounds) => Row::Distribution(Histogram::new(bounds.clone())),
        }
    }

    fn add(&self, value: f64) {
        match self {
            Row::Count(count) => {
                count.fetch_add(1, Ordering::Relaxed);
            }
            Row::Sum(sum) => {
                let _ = sum.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                    Some((f64::from_bits(bits) + value).to_bits())
                });
            }
            Row::LastValue(last) => last.store(value.to_bits(), Ordering::Relaxed),
            Row::Distribution(h) => h.observe(value),
        }
    }

    fn data(&self) -> RowData {
        match self {
            Row::Count(count) => RowData::Count {
                value: count.load(Ordering::Relaxed),
            },
            Row::Sum(sum) => RowData::Sum {
                value: f64::from_bits(sum.load(Ordering::Relaxed)),
            },
            Row::LastValue(last) => RowData::LastValue {
                value: f64::from_bits(last.load(Ordering::Relaxed)),
            },
            Row::Distribution(h) => RowData::Distribution(DistributionData {
                count: h.total_count(),
                sum: h.sum(),
                mean: h.mean(),
                min: h.min(),
                max: h.max(),
                bounds: h.bounds().to_vec(),
                buckets: h.bucket_counts(),
            }),
        }
    }
}

/// A registered view and its rows keyed by projected tag values
#[derive(Debug)]
struct ViewData {
    view: View,
    rows: RwLock<HashMap<Vec<String>, Arc<Row>>>,
}

impl ViewData {
    fn row(&self, key: Vec<String>) -> Arc<Row> {
        if let Some(row) = self.rows.read().get(&key) {
            return Arc::clone(row);
        }
        let mut rows = self.rows.write();
        Arc::clone(
            rows.entry(key)
                .or_insert_with(|| Arc::new(Row::new(&self.view.aggregation))),
        )
    }

    fn tagged_rows(&self) -> Vec<(TagSet, RowData)> {
        self.rows
            .read()
            .iter()
            .map(|(values, row)| {
                let tags = self
                    .view
                    .tag_keys
                    .iter()
                    .cloned()
                    .zip(values.iter().cloned())
                    .collect();
                (tags, row.data())
            })
            .collect()
    }
}

/// Thread-safe view registry and aggregation store
#[derive(Debug, Default)]
pub struct Metrics {
    views: RwLock<HashMap<String, Arc<ViewData>>>,
}

impl Metrics {
    /// Create a new metrics store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view.
    ///
    /// Registering an identical view again is a no-op.
    pub fn register_view(&self, view: View) -> MetricsResult<()> {
        view.validate()?;
        let mut views = self.views.write();
        if let Some(existing) = views.get(&view.name) {
            if existing.view == view {
                tracing::debug!(view = %view.name, "view already registered");
                return Ok(());
            }
            return Err(MetricsError::ViewConflict(view.name));
        }
        tracing::info!(
            view = %view.name,
            aggregation = view.aggregation.kind_name(),
            tags = view.tag_keys.len(),
            "registered view"
        );
        let name = view.name.clone();
        views.insert(
            name,
            Arc::new(ViewData {
                view,
                rows: RwLock::new(HashMap::new()),
            }),
        );
        Ok(())
    }

    /// Unregister a view and drop its rows
    pub fn unregister_view(&self, name: &str) -> MetricsResult<()> {
        match self.views.write().remove(name) {
            Some(_) => Ok(()),
            None => Err(MetricsError::UnknownView(name.to_string())),
        }
    }

    /// Look up a registered view
    pub fn view(&self, name: &str) -> Option<View> {
        self.views.read().get(name).map(|data| data.view.clone())
    }

    /// Rows of a view with their tags
    pub fn rows(&self, name: &str) -> MetricsResult<Vec<(TagSet, RowData)>> {
        let data = self
            .views
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| MetricsError::UnknownView(name.to_string()))?;
        Ok(data.tagged_rows())
    }

    /// Row of a view for the given tags, if anything was recorded there
    pub fn row(&self, name: &str, tags: &TagSet) -> Option<RowData> {
        let data = self.views.read().get(name).cloned()?;
        let key = tags.project(&data.view.tag_keys);
        let row = data.rows.read().get(&key).cloned()?;
        Some(row.data())
    }

    /// All views with their rows
    pub fn all_views(&self) -> Vec<(View, Vec<(TagSet, RowData)>)> {
        let views: Vec<_> = self.views.read().values().cloned().collect();
        views
            .iter()
            .map(|data| (data.view.clone(), data.tagged_rows()))
            .collect()
    }
}

impl Recorder for Metrics {
    fn record(&self, tags: &TagSet, measurements: &[Measurement], attachments: &Attachments) {
        let views: Vec<_> = self.views.read().values().cloned().collect();
        for measurement in measurements {
            let mut matched = false;
            for data in views
                .iter()
                .filter(|data| data.view.measure == *measurement.measure())
            {
                matched = true;
                data.row(tags.project(&data.view.tag_keys))
                    .add(measurement.value());
            }
            if !matched {
                tracing::trace!(
                    measure = measurement.measure().name(),
                    attachments = attachments.len(),
                    "measurement has no view"
                );
            }
        }
    }
}

static GLOBAL: OnceLock<Metrics> = OnceLock::new();

/// Process-wide metrics store
pub fn global() -> &'static Metrics {
    GLOBAL.get_or_init(Metrics::new)
}

/// Tag key shorthand for tests
#[cfg(test)]
pub(crate) fn tags(pairs: &[(&str, &str)]) -> TagSet {
    pairs
        .iter()
        .map(|(k, v)| (crate::tags::TagKey::new(*k), v.to_string()))
        .collect()
}
