//! Monitor configuration file

use crate::error::ConfigError;
use pipemon_types::MonitorSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of a monitor configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configured monitors
    #[serde(default)]
    pub monitors: Vec<MonitorSpec>,
}

impl Config {
    /// Parse configuration text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!(path = %path.display(), "loading configuration");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Number of metrics across all monitors
    pub fn metric_count(&self) -> usize {
        self.monitors.iter().map(|m| m.metrics.len()).sum()
    }
}
