//! Shared test helpers for `timeloom-core` integration tests.
//!
//! In-memory mocks for the core ports plus a manual clock, so tests can
//! drive the state machine deterministically without touching the
//! filesystem or the wall clock.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use timeloom_core::timer::ports::{Clock, TimerObserver, TimerStateStore};
use timeloom_core::tracking::ports::{TicketMetadata, TicketMetadataSource};
use timeloom_core::worklog::ports::ManifestStore;
use timeloom_domain::{
    Result as DomainResult, TaskManifest, TimeLoomError, TimerPersistenceState, TimerState,
};

/// Hand-cranked clock.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: Arc::new(Mutex::new(Utc::now())) }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// In-memory mock for `ManifestStore`.
#[derive(Default)]
pub struct MemoryManifestStore {
    manifests: Mutex<BTreeMap<String, TaskManifest>>,
}

impl MemoryManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read, bypassing the port, for assertions.
    pub fn manifest(&self, ticket_id: &str) -> Option<TaskManifest> {
        self.manifests.lock().unwrap().get(ticket_id).cloned()
    }
}

#[async_trait]
impl ManifestStore for MemoryManifestStore {
    async fn load(&self, ticket_id: &str) -> DomainResult<Option<TaskManifest>> {
        Ok(self.manifests.lock().unwrap().get(ticket_id).cloned())
    }

    async fn save(&self, manifest: &TaskManifest) -> DomainResult<()> {
        self.manifests
            .lock()
            .unwrap()
            .insert(manifest.ticket_id.clone(), manifest.clone());
        Ok(())
    }

    async fn load_all(&self) -> DomainResult<Vec<TaskManifest>> {
        Ok(self.manifests.lock().unwrap().values().cloned().collect())
    }
}

/// In-memory mock for `TimerStateStore`.
#[derive(Default)]
pub struct MemoryTimerStateStore {
    state: Mutex<Option<TimerPersistenceState>>,
}

impl MemoryTimerStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a pre-crash snapshot.
    pub fn with_state(state: TimerPersistenceState) -> Self {
        Self { state: Mutex::new(Some(state)) }
    }

    pub fn snapshot(&self) -> Option<TimerPersistenceState> {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl TimerStateStore for MemoryTimerStateStore {
    async fn load(&self) -> DomainResult<Option<TimerPersistenceState>> {
        Ok(self.snapshot())
    }

    async fn save(&self, state: &TimerPersistenceState) -> DomainResult<()> {
        *self.state.lock().unwrap() = Some(state.clone());
        Ok(())
    }

    async fn clear(&self) -> DomainResult<()> {
        *self.state.lock().unwrap() = None;
        Ok(())
    }
}

/// Observer that records every published snapshot and idle prompt.
#[derive(Default)]
pub struct RecordingObserver {
    pub states: Mutex<Vec<TimerState>>,
    pub idle_prompts: Mutex<Vec<i64>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_state(&self) -> Option<TimerState> {
        self.states.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TimerObserver for RecordingObserver {
    async fn timer_updated(&self, state: TimerState) {
        self.states.lock().unwrap().push(state);
    }

    async fn idle_paused(&self, idle_secs: i64, _state: TimerState) {
        self.idle_prompts.lock().unwrap().push(idle_secs);
    }
}

/// Metadata source returning a fixed status/assignee.
pub struct StaticTicketSource {
    pub status: String,
    pub assignee: String,
}

impl StaticTicketSource {
    pub fn new(status: &str, assignee: &str) -> Self {
        Self { status: status.to_string(), assignee: assignee.to_string() }
    }
}

#[async_trait]
impl TicketMetadataSource for StaticTicketSource {
    async fn fetch(&self, _ticket_id: &str) -> DomainResult<TicketMetadata> {
        Ok(TicketMetadata { status: self.status.clone(), assignee: self.assignee.clone() })
    }
}

/// Metadata source that always fails, for degraded-start tests.
pub struct FailingTicketSource;

#[async_trait]
impl TicketMetadataSource for FailingTicketSource {
    async fn fetch(&self, ticket_id: &str) -> DomainResult<TicketMetadata> {
        Err(TimeLoomError::TicketSource(format!("no backend for {ticket_id}")))
    }
}
