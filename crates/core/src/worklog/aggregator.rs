//! Work-log aggregation service
//!
//! Converts completed timer sessions into manifest entries and answers the
//! derived queries (unsynced logs, billable-history statistics, recent
//! tasks). The aggregator owns all manifest mutations; the timer engine
//! never touches storage itself.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDateTime, NaiveTime, Utc};
use timeloom_domain::{
    HistoryStats, ManifestStatus, RecentTask, Result, TaskManifest, TicketTotal, TimeLoomError,
    WorkLog,
};
use tracing::{debug, warn};

use super::ports::ManifestStore;
use crate::timer::ports::Clock;

/// Aggregates work logs into per-ticket manifests.
pub struct WorkLogAggregator {
    manifests: Arc<dyn ManifestStore>,
    clock: Arc<dyn Clock>,
}

impl WorkLogAggregator {
    /// Create a new aggregator over the given manifest store.
    pub fn new(manifests: Arc<dyn ManifestStore>, clock: Arc<dyn Clock>) -> Self {
        Self { manifests, clock }
    }

    /// Load the manifest for a ticket, creating an empty active one if it
    /// does not exist yet.
    pub async fn ensure_manifest(
        &self,
        ticket_id: &str,
        ticket_summary: &str,
        started_by: &str,
    ) -> Result<TaskManifest> {
        if let Some(manifest) = self.manifests.load(ticket_id).await? {
            return Ok(manifest);
        }
        let manifest =
            TaskManifest::new(ticket_id, ticket_summary, started_by, self.clock.now());
        self.manifests.save(&manifest).await?;
        debug!(ticket_id, "created manifest");
        Ok(manifest)
    }

    /// Append a completed session's log to the ticket's manifest.
    ///
    /// A missing manifest is created on the fly (with a warning) rather
    /// than silently dropping the log; session start normally creates the
    /// manifest up front, so this path is defensive.
    pub async fn add_log(&self, ticket_id: &str, log: WorkLog) -> Result<()> {
        let now = self.clock.now();
        let mut manifest = match self.manifests.load(ticket_id).await? {
            Some(manifest) => manifest,
            None => {
                warn!(ticket_id, "manifest missing on log append; creating one");
                TaskManifest::new(ticket_id, "", "unknown", now)
            }
        };
        manifest.append_log(log, now);
        self.manifests.save(&manifest).await
    }

    /// Logs not yet reported to the external ticket system, in original
    /// order. A missing manifest yields an empty list.
    pub async fn get_unsynced_logs(&self, ticket_id: &str) -> Result<Vec<WorkLog>> {
        let Some(manifest) = self.manifests.load(ticket_id).await? else {
            return Ok(Vec::new());
        };
        Ok(manifest.logs.into_iter().filter(|log| !log.synced).collect())
    }

    /// Flip `synced`/`synced_at` on the logs whose ids are in `log_ids`.
    ///
    /// Persists once if anything changed; returns how many logs flipped.
    pub async fn mark_logs_synced(&self, ticket_id: &str, log_ids: &[String]) -> Result<usize> {
        let Some(mut manifest) = self.manifests.load(ticket_id).await? else {
            debug!(ticket_id, "mark_logs_synced: no manifest");
            return Ok(0);
        };
        let now = self.clock.now();
        let mut changed = 0;
        for log in &mut manifest.logs {
            if !log.synced && log_ids.iter().any(|id| id == &log.id) {
                log.synced = true;
                log.synced_at = Some(now);
                changed += 1;
            }
        }
        if changed > 0 {
            manifest.last_updated = now;
            self.manifests.save(&manifest).await?;
        }
        Ok(changed)
    }

    /// Remove a log, decrementing the manifest's running total.
    pub async fn delete_log(&self, ticket_id: &str, log_id: &str) -> Result<()> {
        let mut manifest = self
            .manifests
            .load(ticket_id)
            .await?
            .ok_or_else(|| TimeLoomError::NotFound(format!("manifest for {ticket_id}")))?;
        manifest
            .remove_log(log_id, self.clock.now())
            .ok_or_else(|| TimeLoomError::NotFound(format!("log {log_id} on {ticket_id}")))?;
        self.manifests.save(&manifest).await
    }

    /// Mark a ticket's manifest completed.
    pub async fn complete(&self, ticket_id: &str) -> Result<()> {
        let mut manifest = self
            .manifests
            .load(ticket_id)
            .await?
            .ok_or_else(|| TimeLoomError::NotFound(format!("manifest for {ticket_id}")))?;
        manifest.status = ManifestStatus::Completed;
        manifest.last_updated = self.clock.now();
        self.manifests.save(&manifest).await
    }

    /// Recompute billable-history totals by scanning every manifest.
    pub async fn history_stats(&self) -> Result<HistoryStats> {
        let manifests = self.manifests.load_all().await?;
        Ok(compute_stats(&manifests, self.clock.now()))
    }

    /// Manifests for the recent-tasks view, sorted descending by last
    /// update (which starts out equal to `started_at`), truncated to
    /// `limit`. Active manifests qualify even before their first log lands:
    /// a just-started ticket is recent work.
    pub async fn recent_tasks(&self, limit: usize) -> Result<Vec<RecentTask>> {
        let mut manifests = self.manifests.load_all().await?;
        manifests.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        manifests.truncate(limit);
        Ok(manifests
            .into_iter()
            .map(|manifest| RecentTask {
                ticket_id: manifest.ticket_id,
                ticket_summary: manifest.ticket_summary,
                status: manifest.status,
                total_logged_time: manifest.total_logged_time,
                last_updated: manifest.last_updated,
            })
            .collect())
    }
}

/// Bucket every log by its end time, in local calendar terms.
///
/// "Today" is the same local calendar date as `now`; "this week" starts at
/// the most recent Monday 00:00:00 local (Sunday maps back six days).
/// Per-ticket totals are recomputed from the logs, not taken from the
/// manifests' running counters.
fn compute_stats(manifests: &[TaskManifest], now: DateTime<Utc>) -> HistoryStats {
    let now_local = now.with_timezone(&Local);
    let today = now_local.date_naive();
    let days_from_monday = i64::from(now_local.weekday().num_days_from_monday());
    let week_start: NaiveDateTime =
        (today - Duration::days(days_from_monday)).and_time(NaiveTime::MIN);

    let mut stats = HistoryStats::default();
    for manifest in manifests {
        let mut ticket_minutes = 0;
        for log in &manifest.logs {
            ticket_minutes += log.duration;
            let end_local = log.end_time.with_timezone(&Local).naive_local();
            if end_local.date() == today {
                stats.today_minutes += log.duration;
            }
            if end_local >= week_start {
                stats.week_minutes += log.duration;
            }
        }
        if ticket_minutes > 0 {
            stats
                .per_ticket
                .push(TicketTotal { ticket_id: manifest.ticket_id.clone(), total_minutes: ticket_minutes });
        }
    }
    stats.per_ticket.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
    stats
}
