//! Derived statistics types
//!
//! Results of scanning every manifest's logs; computed by the work-log
//! aggregator, never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::types::worklog::ManifestStatus;

/// Total minutes logged against a single ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TicketTotal {
    pub ticket_id: String,
    pub total_minutes: i64,
}

/// Billable-history totals over all manifests.
///
/// A log counts as "today" if its end time falls on today's local calendar
/// date, and as "this week" if its end time is on/after the most recent
/// Monday 00:00:00 local.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct HistoryStats {
    pub today_minutes: i64,
    pub week_minutes: i64,
    pub per_ticket: Vec<TicketTotal>,
}

/// Manifest summary row for the recent-tasks view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct RecentTask {
    pub ticket_id: String,
    pub ticket_summary: String,
    pub status: ManifestStatus,
    pub total_logged_time: i64,
    pub last_updated: DateTime<Utc>,
}
