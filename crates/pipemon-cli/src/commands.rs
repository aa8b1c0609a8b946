//! Command implementations

use crate::cli::{OutputFormat, ReplayArgs};
use crate::config::Config;
use crate::error::ConfigError;
use anyhow::Result;
use pipemon_metrics::{Metrics, MetricsSnapshot};
use pipemon_recorder::{Metric, MonitorSet};
use pipemon_types::RunRecord;
use std::io::Write;
use std::path::Path;

/// Build monitors from a configuration file and register their views
pub fn load_monitors(path: &Path, metrics: &Metrics) -> Result<MonitorSet, ConfigError> {
    let config = Config::load(path)?;
    tracing::debug!(
        monitors = config.monitors.len(),
        metrics = config.metric_count(),
        "configuration parsed"
    );
    let monitors = MonitorSet::new(&config.monitors)?;
    monitors.register_views(metrics)?;
    Ok(monitors)
}

/// Read every run from a JSON file
pub fn load_runs(path: &Path) -> Result<Vec<RunRecord>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RunRecord::parse_many(&text).map_err(|source| ConfigError::Records {
        path: path.to_path_buf(),
        source,
    })
}

/// Record run files and write the snapshot
pub fn replay(args: &ReplayArgs, metrics: &Metrics, out: &mut impl Write) -> Result<()> {
    let monitors = load_monitors(&args.config, metrics)?;

    let mut runs = 0;
    let mut unmatched = 0;
    for path in &args.records {
        for run in load_runs(path)? {
            runs += 1;
            if monitors.record(metrics, &run) == 0 {
                unmatched += 1;
            }
            if args.clean {
                monitors.clean(metrics, &run);
            }
        }
    }
    tracing::info!(runs, unmatched, files = args.records.len(), "replay finished");

    let snapshot = MetricsSnapshot::from_metrics(metrics);
    match args.format {
        OutputFormat::Json => writeln!(out, "{}", snapshot.to_json()?)?,
        OutputFormat::Prometheus => write!(out, "{}", snapshot.to_prometheus())?,
    }
    Ok(())
}

/// Write `<type>\t<name>` for every configured metric
pub fn names(config: &Path, out: &mut impl Write) -> Result<()> {
    let config = Config::load(config)?;
    let monitors = MonitorSet::new(&config.monitors).map_err(ConfigError::from)?;
    for metric in monitors.metrics() {
        writeln!(out, "{}\t{}", metric.metric_type(), metric.metric_name())?;
    }
    Ok(())
}

/// Validate a configuration by building it against an empty store
pub fn check(config: &Path, out: &mut impl Write) -> Result<()> {
    let monitors = load_monitors(config, &Metrics::new())?;
    writeln!(
        out,
        "ok: {} monitors, {} metrics",
        monitors.len(),
        monitors.metrics().count()
    )?;
    Ok(())
}
