//! Crash recovery
//!
//! On process start the last persisted timer snapshot is inspected; if it
//! claims a running session the host shows the user three resolutions:
//! resume as-is, resume crediting the drift since the last persisted tick,
//! or discard. The engine itself never decides.

use std::sync::Arc;

use timeloom_domain::{Result, TimerPersistenceState};
use tracing::{debug, info};

use crate::timer::engine::TimerEngine;
use crate::timer::ports::{Clock, TimerStateStore};

/// The user's resolution for an interrupted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryDecision {
    /// Restore the state exactly as persisted, with no drift adjustment.
    Resume,
    /// Add the drift since the last persisted tick to the elapsed time,
    /// modeling "the timer kept running while the process was down".
    ResumeWithDrift,
    /// Clear the persisted state; no session is restored.
    Discard,
}

/// An interrupted session awaiting a [`RecoveryDecision`].
#[derive(Debug, Clone)]
pub struct RecoveryPrompt {
    /// The snapshot as persisted before the crash.
    pub state: TimerPersistenceState,
    /// Wall-clock seconds between the last persisted tick and now. Never
    /// negative; zero means no time was lost.
    pub drift_secs: i64,
    /// Drift credit is only offered when there is drift to credit and the
    /// session was running un-paused.
    pub offers_drift_credit: bool,
}

/// Inspects the persisted timer snapshot at startup and applies the user's
/// decision.
pub struct RecoveryService {
    store: Arc<dyn TimerStateStore>,
    clock: Arc<dyn Clock>,
}

impl RecoveryService {
    /// Create a recovery service over the timer state store.
    pub fn new(store: Arc<dyn TimerStateStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Check for an interrupted session.
    ///
    /// Returns `None` (leaving the store untouched) when nothing was
    /// persisted or the snapshot does not claim a running session.
    pub async fn inspect(&self) -> Result<Option<RecoveryPrompt>> {
        let Some(state) = self.store.load().await? else {
            return Ok(None);
        };
        if !state.is_running || state.current_ticket_id.is_none() {
            debug!("persisted timer state is not running; nothing to recover");
            return Ok(None);
        }
        let drift_secs = (self.clock.now() - state.last_tick_time).num_seconds().max(0);
        let offers_drift_credit = drift_secs > 0 && !state.is_paused;
        info!(
            ticket_id = state.current_ticket_id.as_deref().unwrap_or_default(),
            drift_secs, "found interrupted session"
        );
        Ok(Some(RecoveryPrompt { state, drift_secs, offers_drift_credit }))
    }

    /// Apply the user's decision for an inspected prompt.
    pub async fn apply(
        &self,
        engine: &Arc<TimerEngine>,
        prompt: RecoveryPrompt,
        decision: RecoveryDecision,
    ) -> Result<()> {
        match decision {
            RecoveryDecision::Discard => {
                info!("discarding interrupted session");
                self.store.clear().await
            }
            RecoveryDecision::Resume => {
                Arc::clone(engine).restore(prompt.state, 0).await;
                Ok(())
            }
            RecoveryDecision::ResumeWithDrift => {
                let credit = if prompt.offers_drift_credit { prompt.drift_secs } else { 0 };
                Arc::clone(engine).restore(prompt.state, credit).await;
                Ok(())
            }
        }
    }
}
