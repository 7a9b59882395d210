//! Configuration loader
//!
//! Loads application configuration from a TOML file with environment
//! overrides. Every setting has a default, so a bare checkout runs with
//! no configuration at all.
//!
//! ## Loading Strategy
//! 1. Probe `./timeloom.toml`, then `./config.toml`
//! 2. Apply `TIMELOOM_*` environment overrides on top
//! 3. Fall back to defaults for anything still unset
//!
//! ## Environment Variables
//! - `TIMELOOM_DATA_DIR`: Root directory for manifests and the timer snapshot
//! - `TIMELOOM_IDLE_THRESHOLD_MINUTES`: Inactivity window before auto-pause
//! - `TIMELOOM_CHECKPOINT_INTERVAL_SECS`: Seconds between crash checkpoints

use std::path::{Path, PathBuf};

use timeloom_domain::{Config, Result, TimeLoomError};
use tracing::{debug, info};

/// Config file names probed in the working directory, in order.
const CONFIG_FILE_CANDIDATES: &[&str] = &["timeloom.toml", "config.toml"];

/// Load configuration from file and environment, with defaults.
pub fn load() -> Result<Config> {
    let mut config = match probe_config_file() {
        Some(path) => {
            info!(path = %path.display(), "loading configuration file");
            load_from_file(&path)?
        }
        None => {
            debug!("no configuration file found; using defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Parse a TOML configuration file.
pub fn load_from_file(path: &Path) -> Result<Config> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| TimeLoomError::Config(format!("cannot read {}: {err}", path.display())))?;
    toml::from_str(&raw)
        .map_err(|err| TimeLoomError::Config(format!("invalid config {}: {err}", path.display())))
}

fn probe_config_file() -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(dir) = std::env::var("TIMELOOM_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(dir);
    }
    if let Some(minutes) = env_i64("TIMELOOM_IDLE_THRESHOLD_MINUTES")? {
        config.tracking.idle_threshold_minutes = minutes;
    }
    if let Some(secs) = env_i64("TIMELOOM_CHECKPOINT_INTERVAL_SECS")? {
        config.tracking.checkpoint_interval_secs = secs;
    }
    Ok(())
}

fn env_i64(name: &str) -> Result<Option<i64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|err| TimeLoomError::Config(format!("invalid {name}: {err}"))),
        Err(_) => Ok(None),
    }
}
