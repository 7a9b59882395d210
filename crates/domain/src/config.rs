//! Application configuration structures
//!
//! Populated by the infra loader from environment variables or a TOML file;
//! every field has a safe default so a bare checkout runs without setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHECKPOINT_INTERVAL_SECS, DEFAULT_IDLE_THRESHOLD_MINUTES};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub storage: StorageConfig,
}

/// Timer engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Inactivity window before a running timer auto-pauses, in minutes.
    pub idle_threshold_minutes: i64,
    /// Seconds between crash-recovery checkpoint writes while running.
    pub checkpoint_interval_secs: i64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            idle_threshold_minutes: DEFAULT_IDLE_THRESHOLD_MINUTES,
            checkpoint_interval_secs: DEFAULT_CHECKPOINT_INTERVAL_SECS,
        }
    }
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for manifests and the timer snapshot.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from(".timeloom") }
    }
}
