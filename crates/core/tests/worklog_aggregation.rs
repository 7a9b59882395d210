//! Manifest aggregation and query tests.

mod support;

use std::sync::Arc;

use chrono::Duration;
use timeloom_core::timer::ports::Clock;
use timeloom_core::worklog::ports::ManifestStore;
use timeloom_core::WorkLogAggregator;
use timeloom_domain::{ManifestStatus, TicketSnapshot, TimeLoomError, WorkLog};

use support::{ManualClock, MemoryManifestStore};

fn aggregator() -> (WorkLogAggregator, Arc<MemoryManifestStore>, ManualClock) {
    let clock = ManualClock::new();
    let manifests = Arc::new(MemoryManifestStore::new());
    let aggregator = WorkLogAggregator::new(
        Arc::clone(&manifests) as Arc<dyn ManifestStore>,
        Arc::new(clock.clone()) as Arc<dyn Clock>,
    );
    (aggregator, manifests, clock)
}

fn log_of_minutes(clock: &ManualClock, minutes: i64) -> WorkLog {
    let end = clock.now();
    WorkLog::from_session(
        end - Duration::minutes(minutes),
        end,
        minutes * 60,
        TicketSnapshot::unknown(end),
    )
}

#[tokio::test]
async fn totals_stay_equal_to_sum_of_durations() {
    let (aggregator, manifests, clock) = aggregator();
    aggregator.ensure_manifest("PROJ-1", "summary", "dev").await.unwrap();

    for minutes in [30, 45, 0, 12] {
        aggregator.add_log("PROJ-1", log_of_minutes(&clock, minutes)).await.unwrap();
    }

    let manifest = manifests.manifest("PROJ-1").unwrap();
    assert_eq!(manifest.total_logged_time, 87);
    assert_eq!(
        manifest.total_logged_time,
        manifest.logs.iter().map(|log| log.duration).sum::<i64>()
    );
}

#[tokio::test]
async fn add_log_creates_missing_manifest() {
    let (aggregator, manifests, clock) = aggregator();
    aggregator.add_log("PROJ-2", log_of_minutes(&clock, 15)).await.unwrap();

    let manifest = manifests.manifest("PROJ-2").unwrap();
    assert_eq!(manifest.logs.len(), 1);
    assert_eq!(manifest.total_logged_time, 15);
    assert_eq!(manifest.status, ManifestStatus::Active);
}

#[tokio::test]
async fn mark_logs_synced_flips_only_the_named_logs() {
    let (aggregator, manifests, clock) = aggregator();
    aggregator.ensure_manifest("PROJ-1", "summary", "dev").await.unwrap();
    aggregator.add_log("PROJ-1", log_of_minutes(&clock, 10)).await.unwrap();
    aggregator.add_log("PROJ-1", log_of_minutes(&clock, 20)).await.unwrap();

    let unsynced = aggregator.get_unsynced_logs("PROJ-1").await.unwrap();
    assert_eq!(unsynced.len(), 2);
    let first_id = unsynced[0].id.clone();

    let changed = aggregator.mark_logs_synced("PROJ-1", &[first_id.clone()]).await.unwrap();
    assert_eq!(changed, 1);

    let manifest = manifests.manifest("PROJ-1").unwrap();
    let first = manifest.logs.iter().find(|log| log.id == first_id).unwrap();
    assert!(first.synced);
    assert!(first.synced_at.is_some());
    let other = manifest.logs.iter().find(|log| log.id != first_id).unwrap();
    assert!(!other.synced);

    let unsynced = aggregator.get_unsynced_logs("PROJ-1").await.unwrap();
    assert_eq!(unsynced.len(), 1);

    // Re-marking an already-synced log changes nothing.
    let changed = aggregator.mark_logs_synced("PROJ-1", &[first_id]).await.unwrap();
    assert_eq!(changed, 0);
}

#[tokio::test]
async fn delete_log_decrements_the_total() {
    let (aggregator, manifests, clock) = aggregator();
    aggregator.ensure_manifest("PROJ-1", "summary", "dev").await.unwrap();
    aggregator.add_log("PROJ-1", log_of_minutes(&clock, 30)).await.unwrap();
    aggregator.add_log("PROJ-1", log_of_minutes(&clock, 45)).await.unwrap();

    let target = manifests.manifest("PROJ-1").unwrap().logs[1].id.clone();
    aggregator.delete_log("PROJ-1", &target).await.unwrap();

    let manifest = manifests.manifest("PROJ-1").unwrap();
    assert_eq!(manifest.logs.len(), 1);
    assert_eq!(manifest.total_logged_time, 30);

    let err = aggregator.delete_log("PROJ-1", &target).await.unwrap_err();
    assert!(matches!(err, TimeLoomError::NotFound(_)));
}

#[tokio::test]
async fn history_stats_attribute_recent_logs_to_the_week() {
    let (aggregator, _, clock) = aggregator();
    aggregator.ensure_manifest("PROJ-X", "summary", "dev").await.unwrap();
    aggregator.add_log("PROJ-X", log_of_minutes(&clock, 30)).await.unwrap();
    aggregator.add_log("PROJ-X", log_of_minutes(&clock, 45)).await.unwrap();

    // Both logs just ended, so both fall after the most recent Monday.
    let stats = aggregator.history_stats().await.unwrap();
    assert_eq!(stats.week_minutes, 75);
    assert_eq!(stats.per_ticket.len(), 1);
    assert_eq!(stats.per_ticket[0].ticket_id, "PROJ-X");
    assert_eq!(stats.per_ticket[0].total_minutes, 75);
}

#[tokio::test]
async fn recent_tasks_include_just_started_tickets() {
    let (aggregator, _, _) = aggregator();
    aggregator.ensure_manifest("PROJ-NEW", "just started", "dev").await.unwrap();

    // No log has landed yet, but an active manifest is recent work.
    let recent = aggregator.recent_tasks(10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].ticket_id, "PROJ-NEW");
    assert_eq!(recent[0].status, ManifestStatus::Active);
    assert_eq!(recent[0].total_logged_time, 0);
}

#[tokio::test]
async fn recent_tasks_sorted_by_last_update_and_truncated() {
    let (aggregator, _, clock) = aggregator();
    aggregator.ensure_manifest("PROJ-1", "first", "dev").await.unwrap();
    clock.advance_secs(60);
    aggregator.ensure_manifest("PROJ-2", "second", "dev").await.unwrap();
    clock.advance_secs(60);
    aggregator.ensure_manifest("PROJ-3", "third", "dev").await.unwrap();
    clock.advance_secs(60);
    aggregator.add_log("PROJ-1", log_of_minutes(&clock, 5)).await.unwrap();
    aggregator.complete("PROJ-2").await.unwrap();

    let recent = aggregator.recent_tasks(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    // PROJ-1 and PROJ-2 were both touched last; PROJ-3 falls off.
    let ids: Vec<&str> = recent.iter().map(|task| task.ticket_id.as_str()).collect();
    assert!(ids.contains(&"PROJ-1"));
    assert!(ids.contains(&"PROJ-2"));

    let completed = recent.iter().find(|task| task.ticket_id == "PROJ-2").unwrap();
    assert_eq!(completed.status, ManifestStatus::Completed);
}
