//! Tracker facade - ties the timer engine to work-log persistence
//!
//! Hosts talk to this service rather than to the engine directly: starting
//! a session captures the ticket snapshot and guarantees the manifest
//! exists, stopping one persists the produced work log.

use std::sync::Arc;

use timeloom_domain::{Result, TicketSnapshot, TimerState, WorkLog};
use tracing::warn;

use crate::timer::engine::TimerEngine;
use crate::timer::ports::Clock;
use crate::tracking::ports::TicketMetadataSource;
use crate::worklog::aggregator::WorkLogAggregator;

/// Session lifecycle facade over the engine and aggregator.
pub struct TrackerService {
    engine: Arc<TimerEngine>,
    aggregator: Arc<WorkLogAggregator>,
    tickets: Arc<dyn TicketMetadataSource>,
    clock: Arc<dyn Clock>,
}

impl TrackerService {
    /// Create a new tracker service.
    pub fn new(
        engine: Arc<TimerEngine>,
        aggregator: Arc<WorkLogAggregator>,
        tickets: Arc<dyn TicketMetadataSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { engine, aggregator, tickets, clock }
    }

    /// Start tracking a ticket.
    ///
    /// Fetches ticket metadata for the session snapshot (failure degrades
    /// to no snapshot; the eventual log falls back to "unknown"), makes
    /// sure the manifest exists, then starts the engine. Starting while a
    /// session is already running is the engine's documented no-op.
    pub async fn start_session(
        &self,
        ticket_id: &str,
        ticket_summary: &str,
        started_by: &str,
    ) -> Result<()> {
        let snapshot = match self.tickets.fetch(ticket_id).await {
            Ok(metadata) => Some(TicketSnapshot {
                status: metadata.status,
                assignee: metadata.assignee,
                captured_at: self.clock.now(),
            }),
            Err(err) => {
                warn!(ticket_id, error = %err, "ticket metadata unavailable; starting without snapshot");
                None
            }
        };
        self.aggregator.ensure_manifest(ticket_id, ticket_summary, started_by).await?;
        Arc::clone(&self.engine).start(ticket_id, snapshot).await;
        Ok(())
    }

    /// Stop the running session and persist its work log.
    ///
    /// Returns the log, or `None` if nothing was running.
    pub async fn stop_session(&self) -> Result<Option<WorkLog>> {
        let state = self.engine.state().await;
        let Some(ticket_id) = state.current_ticket_id else {
            return Ok(None);
        };
        let Some(log) = self.engine.stop().await else {
            return Ok(None);
        };
        self.aggregator.add_log(&ticket_id, log.clone()).await?;
        Ok(Some(log))
    }

    /// Explicitly pause the running session.
    pub async fn pause(&self) {
        self.engine.pause().await;
    }

    /// Resume a paused session, optionally crediting the paused interval.
    pub async fn resume(&self, include_idle: bool) {
        self.engine.resume(include_idle).await;
    }

    /// Forward an activity signal to the engine.
    pub async fn activity(&self) {
        self.engine.activity().await;
    }

    /// Snapshot of the current timer state.
    pub async fn state(&self) -> TimerState {
        self.engine.state().await
    }

    /// Shut the tracker down, persisting any in-flight session's log.
    pub async fn shutdown(&self) -> Result<Option<WorkLog>> {
        let state = self.engine.state().await;
        let Some(ticket_id) = state.current_ticket_id else {
            self.engine.dispose().await;
            return Ok(None);
        };
        let Some(log) = self.engine.dispose().await else {
            return Ok(None);
        };
        self.aggregator.add_log(&ticket_id, log.clone()).await?;
        Ok(Some(log))
    }
}
