//! Fixed-bucket histogram

use std::sync::atomic::{AtomicU64, Ordering};

/// Histogram for tracking value distributions.
///
/// `bounds.len() + 1` buckets; a value lands in the first bucket whose upper
/// bound is `>=` the value, the last bucket takes everything above.
#[derive(Debug)]
pub struct Histogram {
    /// Upper bucket bounds
    bounds: Vec<f64>,
    /// Counts per bucket, last one is overflow
    counts: Vec<AtomicU64>,
    /// Sum of all values (f64 bits)
    sum: AtomicU64,
    /// Total count
    count: AtomicU64,
    /// Smallest value (f64 bits)
    min: AtomicU64,
    /// Largest value (f64 bits)
    max: AtomicU64,
}

impl Histogram {
    /// Create histogram with the given upper bounds
    pub fn new(bounds: Vec<f64>) -> Self {
        let counts = (0..=bounds.len()).map(|_| AtomicU64::new(0)).collect();
        Histogram {
            bounds,
            counts,
            sum: AtomicU64::new(0f64.to_bits()),
            count: AtomicU64::new(0),
            min: AtomicU64::new(f64::INFINITY.to_bits()),
            max: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
        }
    }

    /// Record a value
    pub fn observe(&self, value: f64) {
        let bucket = self
            .bounds
            .iter()
            .position(|bound| value <= *bound)
            .unwrap_or(self.bounds.len());
        self.counts[bucket].fetch_add(1, Ordering::Relaxed);

        update_f64(&self.sum, |sum| sum + value);
        update_f64(&self.min, |min| min.min(value));
        update_f64(&self.max, |max| max.max(value));
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Upper bucket bounds
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Per-bucket counts, not cumulative
    pub fn bucket_counts(&self) -> Vec<u64> {
        self.counts
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect()
    }

    /// Get total count
    pub fn total_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Sum of observed values
    pub fn sum(&self) -> f64 {
        f64::from_bits(self.sum.load(Ordering::Relaxed))
    }

    /// Get mean value
    pub fn mean(&self) -> f64 {
        let count = self.total_count();
        if count == 0 {
            return 0.0;
        }
        self.sum() / count as f64
    }

    /// Smallest observed value
    pub fn min(&self) -> Option<f64> {
        (self.total_count() > 0).then(|| f64::from_bits(self.min.load(Ordering::Relaxed)))
    }

    /// Largest observed value
    pub fn max(&self) -> Option<f64> {
        (self.total_count() > 0).then(|| f64::from_bits(self.max.load(Ordering::Relaxed)))
    }
}

fn update_f64(cell: &AtomicU64, f: impl Fn(f64) -> f64) {
    // closure always returns Some, the update cannot fail
    let _ = cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
        Some(f(f64::from_bits(bits)).to_bits())
    });
}
