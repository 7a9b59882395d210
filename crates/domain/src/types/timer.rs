//! Timer state types
//!
//! The live session state observed by hosts and the disposable snapshot
//! written for crash recovery. Persisted shapes serialize camelCase because
//! the manifest files are shared with the TypeScript UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// Immutable copy of external ticket metadata taken at session start.
///
/// Never refreshed mid-session; embedded verbatim in the resulting
/// [`WorkLog`](crate::types::worklog::WorkLog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TicketSnapshot {
    pub status: String,
    pub assignee: String,
    pub captured_at: DateTime<Utc>,
}

impl TicketSnapshot {
    /// Fallback snapshot used when no ticket metadata was captured.
    pub fn unknown(now: DateTime<Utc>) -> Self {
        Self { status: "unknown".to_string(), assignee: "unknown".to_string(), captured_at: now }
    }
}

/// Observable snapshot of the timer engine.
///
/// Published to observers on every transition and every tick. `is_paused`
/// is meaningful only while `is_running` is true; `current_ticket_id` is
/// `Some` iff a session is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TimerState {
    pub is_running: bool,
    pub is_paused: bool,
    pub current_ticket_id: Option<String>,
    /// Accumulated active (non-paused) seconds of the current session only.
    pub elapsed_secs: i64,
    pub session_started_at: Option<DateTime<Utc>>,
    pub ticket_snapshot: Option<TicketSnapshot>,
    /// Total seconds spent paused this session. Diagnostic only.
    pub total_paused_secs: i64,
}

impl TimerState {
    /// The zeroed state outside of any session.
    pub fn stopped() -> Self {
        Self {
            is_running: false,
            is_paused: false,
            current_ticket_id: None,
            elapsed_secs: 0,
            session_started_at: None,
            ticket_snapshot: None,
            total_paused_secs: 0,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::stopped()
    }
}

/// Disposable projection of [`TimerState`] written periodically and on
/// shutdown, used only to restore a session after a crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TimerPersistenceState {
    pub is_running: bool,
    pub is_paused: bool,
    pub current_ticket_id: Option<String>,
    pub elapsed_secs: i64,
    /// Wall-clock time of the last persisted tick; drift on restart is
    /// computed against this.
    pub last_tick_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_snapshot: Option<TicketSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The snapshot file is read by the TypeScript UI as well; field names
    // are part of the wire format.
    #[test]
    fn persistence_state_serializes_camel_case() {
        let state = TimerPersistenceState {
            is_running: true,
            is_paused: false,
            current_ticket_id: Some("PROJ-1".to_string()),
            elapsed_secs: 30,
            last_tick_time: Utc::now(),
            session_started_at: None,
            ticket_snapshot: None,
        };

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["isRunning"], true);
        assert_eq!(json["currentTicketId"], "PROJ-1");
        assert_eq!(json["elapsedSecs"], 30);
        assert!(json.get("lastTickTime").is_some());
        // Absent optionals are omitted, not null.
        assert!(json.get("sessionStartedAt").is_none());
        assert!(json.get("ticketSnapshot").is_none());
    }

    #[test]
    fn legacy_snapshot_without_optionals_still_loads() {
        let json = r#"{
            "isRunning": true,
            "isPaused": true,
            "currentTicketId": "PROJ-2",
            "elapsedSecs": 90,
            "lastTickTime": "2025-06-18T12:00:00Z"
        }"#;

        let state: TimerPersistenceState = serde_json::from_str(json).unwrap();
        assert!(state.is_paused);
        assert_eq!(state.elapsed_secs, 90);
        assert!(state.session_started_at.is_none());
    }
}
