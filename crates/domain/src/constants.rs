//! Domain constants shared across crates.

/// Default inactivity window before a running timer auto-pauses, in minutes.
pub const DEFAULT_IDLE_THRESHOLD_MINUTES: i64 = 5;

/// Default interval between crash-recovery checkpoints, in seconds (ticks).
pub const DEFAULT_CHECKPOINT_INTERVAL_SECS: i64 = 30;

/// Cadence of the timer tick loop, in seconds. One tick advances the
/// session by exactly one second, so this is not configurable.
pub const TICK_INTERVAL_SECS: u64 = 1;

/// File name of the persisted timer snapshot inside the data directory.
pub const TIMER_STATE_FILE: &str = "timer_state.json";

/// Sub-directory of the data directory holding per-ticket manifests.
pub const MANIFESTS_DIR: &str = "manifests";
