//! File-backed manifest store
//!
//! One JSON file per ticket under `<data_dir>/manifests/`, keyed by the
//! sanitized ticket id.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use timeloom_core::worklog::ports::ManifestStore;
use timeloom_domain::constants::MANIFESTS_DIR;
use timeloom_domain::{Result, TaskManifest, TimeLoomError};
use tokio::fs;
use tracing::warn;

use super::{read_json, sanitize_ticket_id, write_json_atomic};

/// JSON-file implementation of [`ManifestStore`].
pub struct JsonManifestStore {
    dir: PathBuf,
}

impl JsonManifestStore {
    /// Create a store rooted at `<data_dir>/manifests`.
    pub fn new(data_dir: &Path) -> Self {
        Self { dir: data_dir.join(MANIFESTS_DIR) }
    }

    fn manifest_path(&self, ticket_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_ticket_id(ticket_id)))
    }
}

#[async_trait]
impl ManifestStore for JsonManifestStore {
    async fn load(&self, ticket_id: &str) -> Result<Option<TaskManifest>> {
        read_json(&self.manifest_path(ticket_id)).await.map_err(Into::into)
    }

    async fn save(&self, manifest: &TaskManifest) -> Result<()> {
        write_json_atomic(&self.manifest_path(&manifest.ticket_id), manifest)
            .await
            .map_err(Into::into)
    }

    async fn load_all(&self) -> Result<Vec<TaskManifest>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(TimeLoomError::Storage(err.to_string())),
        };

        let mut manifests = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| TimeLoomError::Storage(err.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            // An unreadable manifest should not take the whole scan down.
            match read_json::<TaskManifest>(&path).await {
                Ok(Some(manifest)) => manifests.push(manifest),
                Ok(None) => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable manifest");
                }
            }
        }
        Ok(manifests)
    }
}
