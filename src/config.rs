//! # Configuration Management
//!
//! Loads engine configuration from `tide-config.toml`: where the station
//! store lives, whether to copy it into memory at startup, and where the
//! model cache artifact is kept. A missing or invalid config file falls
//! back to defaults rather than failing — the paths below match the layout
//! the batch task container ships with.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Engine configuration loaded from tide-config.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Station/observation store configuration
    pub store: StoreConfig,
    /// Harmonic model cache configuration
    pub model: ModelConfig,
}

/// Station/observation store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path to the sqlite station/observation store
    pub path: String,
    /// Copy the whole store into memory at startup. Worth it only when the
    /// process has RAM to spare for the full observation history (~250 MB);
    /// the catalog itself is loaded into memory either way.
    pub in_memory: bool,
}

/// Harmonic model cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Path to the serialized station→model mapping. Deleted by the
    /// operator to force a rebuild after the observation history changes.
    pub cache_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store: StoreConfig {
                path: "/opt/data/fdh.sqlite".to_string(),
                in_memory: false,
            },
            model: ModelConfig {
                cache_path: "/opt/data/tidemodel.json".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from tide-config.toml in the working directory.
    /// Falls back to default configuration if the file is missing or invalid.
    pub fn load() -> Self {
        Self::load_from_path("tide-config.toml")
    }

    /// Load configuration from the given path.
    /// Falls back to default configuration if the file is missing or invalid.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("invalid config file format ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
