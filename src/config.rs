//! Platform configuration
//!
//! Loaded from a JSON file; every field has a default so a missing or
//! partial file still yields a runnable configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Rolling horizon of future weekly competitions to keep created
    #[serde(default = "default_horizon_weeks")]
    pub horizon_weeks: usize,

    /// Shared slots per week (standard admission ceiling)
    #[serde(default = "default_max_standard_slots")]
    pub max_standard_slots: i64,

    /// Additional premium-only slots above the shared ones
    #[serde(default = "default_max_premium_slots")]
    pub max_premium_slots: i64,

    /// Homepage feature window after going live, in days
    #[serde(default = "default_homepage_duration_days")]
    pub homepage_duration_days: i64,

    /// Cron cadence for the reconciliation scheduler
    #[serde(default = "default_reconcile_cron")]
    pub reconcile_cron: String,
}

fn default_horizon_weeks() -> usize {
    20
}

fn default_max_standard_slots() -> i64 {
    15
}

fn default_max_premium_slots() -> i64 {
    10
}

fn default_homepage_duration_days() -> i64 {
    7
}

fn default_reconcile_cron() -> String {
    "*/5 * * * *".to_string()
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            horizon_weeks: default_horizon_weeks(),
            max_standard_slots: default_max_standard_slots(),
            max_premium_slots: default_max_premium_slots(),
            homepage_duration_days: default_homepage_duration_days(),
            reconcile_cron: default_reconcile_cron(),
        }
    }
}

impl PlatformConfig {
    /// Load from a JSON file; a missing file yields the defaults
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PlatformConfig::default();
        assert_eq!(config.horizon_weeks, 20);
        assert_eq!(config.max_standard_slots, 15);
        assert_eq!(config.max_premium_slots, 10);
        assert_eq!(config.homepage_duration_days, 7);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = PlatformConfig::load(Path::new("/nonexistent/launchboard.json")).unwrap();
        assert_eq!(config.horizon_weeks, 20);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"horizon_weeks\": 4}}").unwrap();

        let config = PlatformConfig::load(file.path()).unwrap();
        assert_eq!(config.horizon_weeks, 4);
        assert_eq!(config.max_standard_slots, 15);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(PlatformConfig::load(file.path()).is_err());
    }
}
