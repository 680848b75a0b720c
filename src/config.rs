//! Dashboard Configuration
//! Input location and display options, read from an optional JSON file.

use crate::data::DEFAULT_HISTOGRAM_BINS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "LOAN_DASHBOARD_CONFIG";
/// Environment variable overriding the dataset location.
pub const DATA_ENV: &str = "LOAN_DASHBOARD_DATA";
pub const DEFAULT_CONFIG_PATH: &str = "loan_dashboard.json";
pub const DEFAULT_DATA_PATH: &str = "data_input/loan_clean.parquet";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Location of the pre-cleaned loan dataset.
    pub data_path: PathBuf,
    /// Bin count for the loan amount histogram.
    pub histogram_bins: usize,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration from the environment.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config = if path.exists() {
            log::info!("Reading config from {}", path.display());
            Self::from_file(&path)?
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        Ok(config.with_data_override(std::env::var_os(DATA_ENV).map(PathBuf::from)))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(text)?;
        config.histogram_bins = config.histogram_bins.max(1);
        Ok(config)
    }

    pub fn with_data_override(mut self, data_path: Option<PathBuf>) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config =
            DashboardConfig::from_json(r#"{ "data_path": "loans.csv", "histogram_bins": 0 }"#)
                .unwrap();
        assert_eq!(config.data_path, PathBuf::from("loans.csv"));
        assert_eq!(config.histogram_bins, 1);
        assert_eq!(config.window_size, [1400.0, 900.0]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = DashboardConfig::from_json(r#"{ "data": "x" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn data_override_wins() {
        let config = DashboardConfig::default()
            .with_data_override(Some(PathBuf::from("elsewhere.parquet")));
        assert_eq!(config.data_path, PathBuf::from("elsewhere.parquet"));

        let unchanged = DashboardConfig::default().with_data_override(None);
        assert_eq!(unchanged.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loan_dashboard.json");
        std::fs::write(&path, r#"{ "window_size": [800.0, 600.0] }"#).unwrap();

        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.window_size, [800.0, 600.0]);

        let missing = DashboardConfig::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
