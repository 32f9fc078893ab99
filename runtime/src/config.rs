//! Configuration management for the trip store.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Key under which the trip collection is stored when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "trips";

/// Runtime configuration for a trip store and the process around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the file backend's records
    pub data_dir: PathBuf,
    /// Key of the single record holding the whole collection
    pub storage_key: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Install the Prometheus recorder
    pub metrics_enabled: bool,
}

impl StoreConfig {
    /// Load configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `FILM_ROLL_DATA_DIR` | `./data` |
    /// | `FILM_ROLL_STORAGE_KEY` | `trips` |
    /// | `FILM_ROLL_LOG_LEVEL` | `info` |
    /// | `FILM_ROLL_METRICS` | `false` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            data_dir: lookup("FILM_ROLL_DATA_DIR")
                .filter(|s| !s.trim().is_empty())
                .map_or(defaults.data_dir, PathBuf::from),
            storage_key: lookup("FILM_ROLL_STORAGE_KEY")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.storage_key),
            log_level: lookup("FILM_ROLL_LOG_LEVEL").unwrap_or(defaults.log_level),
            metrics_enabled: lookup("FILM_ROLL_METRICS")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.metrics_enabled),
        }
    }

    /// Set the data directory
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the storage key
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Enable or disable the metrics recorder
    #[must_use]
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: "info".to_string(),
            metrics_enabled: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
