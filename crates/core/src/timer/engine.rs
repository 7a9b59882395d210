//! Timer state machine
//!
//! Holds the running/paused/idle state for at most one active ticket,
//! advances elapsed time once per second, auto-pauses on inactivity, and
//! resumes on activity or explicit command. The engine owns its 1 Hz tick
//! task: the task is spawned on `start`/`restore` and cancelled on `stop`,
//! with the join handle tracked and awaited with a timeout.
//!
//! The engine never writes work logs itself; `stop` returns the produced
//! [`WorkLog`] and the caller persists it. Checkpoint writes to the
//! [`TimerStateStore`] are best-effort: a lost checkpoint only degrades
//! crash-recovery fidelity, never the live session.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use timeloom_domain::config::TrackingConfig;
use timeloom_domain::constants::TICK_INTERVAL_SECS;
use timeloom_domain::{TicketSnapshot, TimerPersistenceState, TimerState, WorkLog};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ports::{Clock, TimerObserver, TimerStateStore};

/// Timeout for joining the tick task after cancellation.
const TICK_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Engine tuning derived from [`TrackingConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Inactivity window before a running timer auto-pauses, in seconds.
    pub idle_threshold_secs: i64,
    /// Ticks between crash-recovery checkpoint writes.
    pub checkpoint_interval_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&TrackingConfig::default())
    }
}

impl From<&TrackingConfig> for EngineConfig {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            idle_threshold_secs: config.idle_threshold_minutes.max(0) * 60,
            checkpoint_interval_secs: config.checkpoint_interval_secs.max(1),
        }
    }
}

/// An in-flight pause.
struct Pause {
    since: DateTime<Utc>,
    /// Idle auto-pauses are lifted by the next activity signal; explicit
    /// pauses are not.
    auto: bool,
}

/// The single active session, if any.
struct Session {
    ticket_id: String,
    started_at: DateTime<Utc>,
    snapshot: Option<TicketSnapshot>,
    elapsed_secs: i64,
    pause: Option<Pause>,
    total_paused_secs: i64,
    last_activity: DateTime<Utc>,
    ticks_since_checkpoint: i64,
}

/// Handle to the spawned tick loop.
struct TickTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl TickTask {
    async fn shutdown(self) {
        self.cancel.cancel();
        match tokio::time::timeout(TICK_JOIN_TIMEOUT, self.handle).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "tick task join failed"),
            Err(_) => warn!("tick task did not stop within timeout"),
        }
    }
}

struct Inner {
    session: Option<Session>,
    tick_task: Option<TickTask>,
}

/// The timer state machine.
///
/// Exactly one instance exists per process; every operation locks the
/// session state for its full duration, so no two mutations interleave.
pub struct TimerEngine {
    clock: Arc<dyn Clock>,
    state_store: Arc<dyn TimerStateStore>,
    observers: RwLock<Vec<Arc<dyn TimerObserver>>>,
    config: EngineConfig,
    inner: Mutex<Inner>,
}

impl TimerEngine {
    /// Create a stopped engine.
    pub fn new(
        clock: Arc<dyn Clock>,
        state_store: Arc<dyn TimerStateStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            clock,
            state_store,
            observers: RwLock::new(Vec::new()),
            config,
            inner: Mutex::new(Inner { session: None, tick_task: None }),
        }
    }

    /// Register an observer for state snapshots and idle prompts.
    pub async fn subscribe(&self, observer: Arc<dyn TimerObserver>) {
        self.observers.write().await.push(observer);
    }

    /// Start a session for `ticket_id`.
    ///
    /// A no-op (logged) if a session is already running: the existing
    /// session's ticket and elapsed time are left untouched.
    pub async fn start(self: Arc<Self>, ticket_id: &str, snapshot: Option<TicketSnapshot>) {
        let (state, checkpoint) = {
            let mut inner = self.inner.lock().await;
            if inner.session.is_some() {
                info!(ticket_id, "start ignored: a session is already running");
                return;
            }
            let now = self.clock.now();
            let session = Session {
                ticket_id: ticket_id.to_string(),
                started_at: now,
                snapshot,
                elapsed_secs: 0,
                pause: None,
                total_paused_secs: 0,
                last_activity: now,
                ticks_since_checkpoint: 0,
            };
            let checkpoint = persistence_state(&session, now);
            inner.session = Some(session);
            Self::spawn_tick_task(&self, &mut inner);
            (observable_state(inner.session.as_ref()), checkpoint)
        };
        info!(ticket_id, "session started");
        self.write_checkpoint(&checkpoint).await;
        self.notify(state).await;
    }

    /// Explicitly pause the running session.
    ///
    /// A no-op unless running and not already paused. Idle auto-pauses are
    /// entered by the tick loop instead, because only the tick sees the
    /// idle threshold crossing.
    pub async fn pause(&self) {
        let (state, checkpoint) = {
            let mut inner = self.inner.lock().await;
            let now = self.clock.now();
            let Some(session) = inner.session.as_mut() else {
                debug!("pause ignored: no session is running");
                return;
            };
            if session.pause.is_some() {
                debug!("pause ignored: session is already paused");
                return;
            }
            session.pause = Some(Pause { since: now, auto: false });
            let checkpoint = persistence_state(session, now);
            (observable_state(inner.session.as_ref()), checkpoint)
        };
        info!("session paused");
        self.write_checkpoint(&checkpoint).await;
        self.notify(state).await;
    }

    /// Resume a paused session.
    ///
    /// With `include_idle`, the whole paused interval is credited to
    /// `elapsed_secs` as worked time; either way it accumulates into the
    /// diagnostic paused total. A no-op unless paused.
    pub async fn resume(&self, include_idle: bool) {
        let (state, checkpoint) = {
            let mut inner = self.inner.lock().await;
            let now = self.clock.now();
            let Some(session) = inner.session.as_mut() else {
                debug!("resume ignored: no session is running");
                return;
            };
            let Some(pause) = session.pause.take() else {
                debug!("resume ignored: session is not paused");
                return;
            };
            let paused_secs = (now - pause.since).num_seconds().max(0);
            if include_idle {
                session.elapsed_secs += paused_secs;
            }
            session.total_paused_secs += paused_secs;
            // Resuming counts as activity, otherwise the next tick would
            // immediately re-pause for idleness.
            session.last_activity = now;
            let checkpoint = persistence_state(session, now);
            (observable_state(inner.session.as_ref()), checkpoint)
        };
        info!(include_idle, "session resumed");
        self.write_checkpoint(&checkpoint).await;
        self.notify(state).await;
    }

    /// Stop the running session, producing exactly one [`WorkLog`].
    ///
    /// Returns `None` (and mutates nothing) when no session is running.
    /// The caller is responsible for persisting the returned log; the
    /// engine only clears its crash-recovery snapshot.
    pub async fn stop(&self) -> Option<WorkLog> {
        let (session, tick_task) = {
            let mut inner = self.inner.lock().await;
            let Some(session) = inner.session.take() else {
                debug!("stop ignored: no session is running");
                return None;
            };
            (session, inner.tick_task.take())
        };
        if let Some(task) = tick_task {
            task.shutdown().await;
        }

        let now = self.clock.now();
        let snapshot = session.snapshot.unwrap_or_else(|| TicketSnapshot::unknown(now));
        let log = WorkLog::from_session(session.started_at, now, session.elapsed_secs, snapshot);

        if let Err(err) = self.state_store.clear().await {
            warn!(error = %err, "failed to clear persisted timer state");
        }
        info!(
            ticket_id = %session.ticket_id,
            elapsed_secs = session.elapsed_secs,
            duration_minutes = log.duration,
            "session stopped"
        );
        self.notify(TimerState::stopped()).await;
        Some(log)
    }

    /// Tear the engine down.
    ///
    /// A running session is stopped and its log returned so the host can
    /// persist it; the tick task is always cancelled.
    pub async fn dispose(&self) -> Option<WorkLog> {
        self.stop().await
    }

    /// Advance the session by one whole second.
    ///
    /// Invoked once per second by the tick task; exposed so tests can
    /// drive the state machine deterministically. Does nothing while
    /// stopped or paused.
    pub async fn tick(&self) {
        let (state, checkpoint, idle_secs) = {
            let mut inner = self.inner.lock().await;
            let now = self.clock.now();
            let Some(session) = inner.session.as_mut() else {
                return;
            };
            if session.pause.is_some() {
                return;
            }
            session.elapsed_secs += 1;
            session.ticks_since_checkpoint += 1;

            let idle_secs = (now - session.last_activity).num_seconds();
            let idle_event = if idle_secs >= self.config.idle_threshold_secs {
                // The session lock is already held here, so the auto pause
                // is entered inline rather than through `pause`.
                session.pause = Some(Pause { since: now, auto: true });
                Some(idle_secs)
            } else {
                None
            };

            let checkpoint = if session.ticks_since_checkpoint >= self.config.checkpoint_interval_secs
            {
                session.ticks_since_checkpoint = 0;
                Some(persistence_state(session, now))
            } else {
                None
            };

            (observable_state(inner.session.as_ref()), checkpoint, idle_event)
        };

        if let Some(checkpoint) = &checkpoint {
            self.write_checkpoint(checkpoint).await;
        }
        if let Some(idle_secs) = idle_secs {
            info!(idle_secs, "auto-paused for inactivity");
            self.notify_idle(idle_secs, state.clone()).await;
        }
        self.notify(state).await;
    }

    /// Record an activity signal.
    ///
    /// Resets the idle clock; if the session was auto-paused for idleness
    /// the pause is involuntary, so activity implicitly resumes with no
    /// idle credit. Explicit pauses are left alone.
    pub async fn activity(&self) {
        let auto_paused = {
            let mut inner = self.inner.lock().await;
            let now = self.clock.now();
            let Some(session) = inner.session.as_mut() else {
                return;
            };
            session.last_activity = now;
            session.pause.as_ref().is_some_and(|pause| pause.auto)
        };
        if auto_paused {
            debug!("activity after idle pause; resuming without credit");
            self.resume(false).await;
        }
    }

    /// Re-seed the engine from a crash-recovery snapshot.
    ///
    /// `credit_secs` is the drift credit chosen by the user (zero for a
    /// plain resume). A persisted mid-pause session re-enters `Paused`
    /// with a fresh pause start of now. A no-op if a session is already
    /// running or the snapshot carries no ticket.
    pub async fn restore(self: Arc<Self>, persisted: TimerPersistenceState, credit_secs: i64) {
        let (state, checkpoint) = {
            let mut inner = self.inner.lock().await;
            if inner.session.is_some() {
                warn!("restore ignored: a session is already running");
                return;
            }
            let Some(ticket_id) = persisted.current_ticket_id else {
                debug!("restore ignored: snapshot has no ticket");
                return;
            };
            let now = self.clock.now();
            let session = Session {
                ticket_id,
                started_at: persisted.session_started_at.unwrap_or(now),
                snapshot: persisted.ticket_snapshot,
                elapsed_secs: persisted.elapsed_secs + credit_secs.max(0),
                pause: persisted.is_paused.then(|| Pause { since: now, auto: false }),
                total_paused_secs: 0,
                last_activity: now,
                ticks_since_checkpoint: 0,
            };
            let checkpoint = persistence_state(&session, now);
            inner.session = Some(session);
            Self::spawn_tick_task(&self, &mut inner);
            (observable_state(inner.session.as_ref()), checkpoint)
        };
        info!(credit_secs, "session restored from crash snapshot");
        self.write_checkpoint(&checkpoint).await;
        self.notify(state).await;
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> TimerState {
        let inner = self.inner.lock().await;
        observable_state(inner.session.as_ref())
    }

    fn spawn_tick_task(engine: &Arc<Self>, inner: &mut Inner) {
        if inner.tick_task.is_some() {
            debug!("tick task already running; not spawning another");
            return;
        }
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let engine = Arc::clone(engine);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(TICK_INTERVAL_SECS));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick of a fresh interval completes immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("tick loop cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        engine.tick().await;
                    }
                }
            }
        });
        inner.tick_task = Some(TickTask { cancel, handle });
    }

    async fn write_checkpoint(&self, checkpoint: &TimerPersistenceState) {
        if let Err(err) = self.state_store.save(checkpoint).await {
            warn!(error = %err, "failed to persist timer checkpoint");
        }
    }

    async fn notify(&self, state: TimerState) {
        let observers = self.observers.read().await;
        for observer in observers.iter() {
            observer.timer_updated(state.clone()).await;
        }
    }

    async fn notify_idle(&self, idle_secs: i64, state: TimerState) {
        let observers = self.observers.read().await;
        for observer in observers.iter() {
            observer.idle_paused(idle_secs, state.clone()).await;
        }
    }
}

fn observable_state(session: Option<&Session>) -> TimerState {
    session.map_or_else(TimerState::stopped, |session| TimerState {
        is_running: true,
        is_paused: session.pause.is_some(),
        current_ticket_id: Some(session.ticket_id.clone()),
        elapsed_secs: session.elapsed_secs,
        session_started_at: Some(session.started_at),
        ticket_snapshot: session.snapshot.clone(),
        total_paused_secs: session.total_paused_secs,
    })
}

fn persistence_state(session: &Session, now: DateTime<Utc>) -> TimerPersistenceState {
    TimerPersistenceState {
        is_running: true,
        is_paused: session.pause.is_some(),
        current_ticket_id: Some(session.ticket_id.clone()),
        elapsed_secs: session.elapsed_secs,
        last_tick_time: now,
        session_started_at: Some(session.started_at),
        ticket_snapshot: session.snapshot.clone(),
    }
}
