//! Console observer for timer state

use async_trait::async_trait;
use timeloom_core::TimerObserver;
use timeloom_domain::TimerState;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stopped,
    Running,
    Paused,
}

impl Phase {
    fn of(state: &TimerState) -> Self {
        if !state.is_running {
            Self::Stopped
        } else if state.is_paused {
            Self::Paused
        } else {
            Self::Running
        }
    }
}

/// Prints phase transitions and idle prompts to the console.
///
/// The engine notifies on every tick; only actual phase changes are worth a
/// line, so ticks within the same phase stay at debug level.
#[derive(Default)]
pub struct ConsoleObserver {
    last_phase: Mutex<Option<Phase>>,
}

#[async_trait]
impl TimerObserver for ConsoleObserver {
    async fn timer_updated(&self, state: TimerState) {
        let phase = Phase::of(&state);
        let mut last = self.last_phase.lock().await;
        if *last == Some(phase) {
            debug!(elapsed_secs = state.elapsed_secs, "tick");
            return;
        }
        *last = Some(phase);
        drop(last);

        match phase {
            Phase::Running => {
                let ticket = state.current_ticket_id.as_deref().unwrap_or("?");
                println!("[timer] tracking {ticket}");
            }
            Phase::Paused => println!("[timer] paused"),
            Phase::Stopped => println!("[timer] stopped"),
        }
    }

    async fn idle_paused(&self, idle_secs: i64, _state: TimerState) {
        println!(
            "[timer] auto-paused after {idle_secs}s of inactivity; \
             'resume --credit' keeps the idle time, 'resume' drops it"
        );
    }
}
