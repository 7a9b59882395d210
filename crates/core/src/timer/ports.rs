//! Port interfaces for the timer engine
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use timeloom_domain::{Result, TimerPersistenceState, TimerState};

/// Wall-clock source.
///
/// Injected so tests can drive the engine with a manual clock; the tick
/// cadence itself comes from the engine's background task, not from here.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Observer of timer state.
///
/// Notified with the full current state on every transition and on every
/// tick. Idle auto-pauses additionally surface through [`idle_paused`]
/// because the resume-with/without-credit decision is deferred to the host,
/// not resolved by the engine.
///
/// [`idle_paused`]: TimerObserver::idle_paused
#[async_trait]
pub trait TimerObserver: Send + Sync {
    /// Called with a state snapshot after every mutation and tick.
    async fn timer_updated(&self, state: TimerState);

    /// Called once when the engine auto-pauses for inactivity.
    ///
    /// `idle_secs` is the wall-clock time since the last activity signal.
    async fn idle_paused(&self, idle_secs: i64, state: TimerState) {
        let _ = (idle_secs, state);
    }
}

/// Trait for persisting the crash-recovery timer snapshot
#[async_trait]
pub trait TimerStateStore: Send + Sync {
    /// Load the last persisted snapshot, if any.
    async fn load(&self) -> Result<Option<TimerPersistenceState>>;

    /// Overwrite the persisted snapshot.
    async fn save(&self, state: &TimerPersistenceState) -> Result<()>;

    /// Remove the persisted snapshot. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<()>;
}
