//! Work-log and manifest types
//!
//! A `WorkLog` is one immutable record of time spent in a single tracked
//! session. A `TaskManifest` is the persisted per-ticket record aggregating
//! ticket metadata, repository modes, and the ordered log sequence.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use crate::types::timer::TicketSnapshot;

/// One immutable record of time spent in a single tracked session.
///
/// Created exactly once when a session stops; only `synced`/`synced_at`
/// may change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct WorkLog {
    /// UUIDv7: creation-time prefix plus random suffix.
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Whole minutes, `floor(elapsed_secs / 60)`. Partial minutes at stop
    /// time are dropped, never rounded up.
    pub duration: i64,
    pub ticket_snapshot: TicketSnapshot,
    /// Whether this log has been reported to the external ticket system.
    pub synced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

impl WorkLog {
    /// Build the log for a completed session.
    pub fn from_session(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        elapsed_secs: i64,
        ticket_snapshot: TicketSnapshot,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            start_time,
            end_time,
            duration: elapsed_secs.max(0) / 60,
            ticket_snapshot,
            synced: false,
            synced_at: None,
        }
    }
}

/// Lifecycle status of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum ManifestStatus {
    Active,
    Completed,
}

/// Repository-mode record carried on the manifest.
///
/// Written by the workspace tooling that prepares checkouts for a ticket;
/// the engine stores it verbatim and never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct RepoEntry {
    pub mode: String,
    pub branch: String,
    pub base_branch: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted per-ticket record aggregating metadata, repository modes, and
/// work logs. One file per ticket, keyed by sanitized ticket id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TaskManifest {
    pub ticket_id: String,
    pub ticket_summary: String,
    pub started_at: DateTime<Utc>,
    pub started_by: String,
    pub status: ManifestStatus,
    #[serde(default)]
    pub repos: BTreeMap<String, RepoEntry>,
    /// Append-only in practice; insertion order is chronological.
    #[serde(default)]
    pub logs: Vec<WorkLog>,
    /// Running sum of `logs[].duration`, in minutes. Maintained
    /// incrementally on append/delete; any full rescan recomputes it.
    pub total_logged_time: i64,
    pub last_updated: DateTime<Utc>,
}

impl TaskManifest {
    /// Create an empty active manifest for a ticket.
    pub fn new(
        ticket_id: impl Into<String>,
        ticket_summary: impl Into<String>,
        started_by: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            ticket_summary: ticket_summary.into(),
            started_at: now,
            started_by: started_by.into(),
            status: ManifestStatus::Active,
            repos: BTreeMap::new(),
            logs: Vec::new(),
            total_logged_time: 0,
            last_updated: now,
        }
    }

    /// Append a log, keeping `total_logged_time` equal to the sum of
    /// log durations.
    pub fn append_log(&mut self, log: WorkLog, now: DateTime<Utc>) {
        self.total_logged_time += log.duration;
        self.logs.push(log);
        self.last_updated = now;
    }

    /// Remove a log by id, decrementing the running total. Returns the
    /// removed log, or `None` if no log matched.
    pub fn remove_log(&mut self, log_id: &str, now: DateTime<Utc>) -> Option<WorkLog> {
        let idx = self.logs.iter().position(|log| log.id == log_id)?;
        let removed = self.logs.remove(idx);
        self.total_logged_time -= removed.duration;
        self.last_updated = now;
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> TicketSnapshot {
        TicketSnapshot::unknown(Utc::now())
    }

    #[test]
    fn duration_floors_partial_minutes() {
        let now = Utc::now();
        let log = WorkLog::from_session(now, now, 125, snapshot());
        assert_eq!(log.duration, 2);

        let log = WorkLog::from_session(now, now, 59, snapshot());
        assert_eq!(log.duration, 0);
    }

    #[test]
    fn negative_elapsed_is_clamped() {
        let now = Utc::now();
        let log = WorkLog::from_session(now, now, -10, snapshot());
        assert_eq!(log.duration, 0);
    }

    #[test]
    fn manifest_serializes_camel_case_with_lowercase_status() {
        let now = Utc::now();
        let mut manifest = TaskManifest::new("PROJ-1", "Fix the widget", "dev", now);
        manifest.append_log(WorkLog::from_session(now, now, 120, snapshot()), now);

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["ticketId"], "PROJ-1");
        assert_eq!(json["status"], "active");
        assert_eq!(json["totalLoggedTime"], 2);
        assert_eq!(json["logs"][0]["duration"], 2);
        assert_eq!(json["logs"][0]["ticketSnapshot"]["assignee"], "unknown");
    }

    #[test]
    fn append_and_remove_keep_total_consistent() {
        let now = Utc::now();
        let mut manifest = TaskManifest::new("PROJ-1", "Fix the widget", "dev", now);

        let first = WorkLog::from_session(now, now, 30 * 60, snapshot());
        let second = WorkLog::from_session(now, now, 45 * 60, snapshot());
        let second_id = second.id.clone();

        manifest.append_log(first, now);
        manifest.append_log(second, now);
        assert_eq!(manifest.total_logged_time, 75);
        assert_eq!(
            manifest.total_logged_time,
            manifest.logs.iter().map(|log| log.duration).sum::<i64>()
        );

        let removed = manifest.remove_log(&second_id, now);
        assert_eq!(removed.map(|log| log.duration), Some(45));
        assert_eq!(manifest.total_logged_time, 30);

        assert!(manifest.remove_log("missing", now).is_none());
        assert_eq!(manifest.total_logged_time, 30);
    }
}
