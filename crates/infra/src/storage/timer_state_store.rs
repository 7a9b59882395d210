//! File-backed timer snapshot store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use timeloom_core::timer::ports::TimerStateStore;
use timeloom_domain::constants::TIMER_STATE_FILE;
use timeloom_domain::{Result, TimerPersistenceState};
use tokio::fs;

use super::{read_json, write_json_atomic};

/// JSON-file implementation of [`TimerStateStore`].
pub struct JsonTimerStateStore {
    path: PathBuf,
}

impl JsonTimerStateStore {
    /// Create a store writing `<data_dir>/timer_state.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join(TIMER_STATE_FILE) }
    }
}

#[async_trait]
impl TimerStateStore for JsonTimerStateStore {
    async fn load(&self) -> Result<Option<TimerPersistenceState>> {
        read_json(&self.path).await.map_err(Into::into)
    }

    async fn save(&self, state: &TimerPersistenceState) -> Result<()> {
        write_json_atomic(&self.path, state).await.map_err(Into::into)
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(crate::errors::StorageError::from(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn state() -> TimerPersistenceState {
        TimerPersistenceState {
            is_running: true,
            is_paused: false,
            current_ticket_id: Some("PROJ-1".to_string()),
            elapsed_secs: 120,
            last_tick_time: Utc::now(),
            session_started_at: None,
            ticket_snapshot: None,
        }
    }

    #[tokio::test]
    async fn round_trips_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTimerStateStore::new(dir.path());

        assert!(store.load().await.unwrap().is_none());
        store.save(&state()).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert!(loaded.is_running);
        assert_eq!(loaded.elapsed_secs, 120);
        assert_eq!(loaded.current_ticket_id.as_deref(), Some("PROJ-1"));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTimerStateStore::new(dir.path());

        store.clear().await.unwrap();
        store.save(&state()).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
