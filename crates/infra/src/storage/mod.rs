//! JSON file persistence
//!
//! Manifests and the timer snapshot are plain JSON files under the data
//! directory. Every write goes to a temporary file first, is fsynced, then
//! renamed over the target, so a crash mid-write never corrupts the
//! previous valid file. There is no cross-process locking; concurrent
//! writers are last-writer-wins.

pub mod manifest_store;
pub mod timer_state_store;

use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::StorageError;

/// Serialize `value` and atomically replace the file at `path`.
pub(crate) async fn write_json_atomic<T: Serialize>(
    path: &Path,
    value: &T,
) -> Result<(), StorageError> {
    let data = serde_json::to_vec_pretty(value)?;

    let temp_path = path.with_extension("tmp");
    if let Some(parent) = temp_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .await?;
    file.write_all(&data).await?;
    file.sync_all().await?;
    drop(file);

    // Atomic rename
    fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Read and deserialize the file at `path`; `None` if it does not exist.
pub(crate) async fn read_json<T: DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, StorageError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Reduce a ticket id to a safe file stem.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`; distinct ids can
/// therefore collide, which callers accept for ids like `PROJ-123`.
pub(crate) fn sanitize_ticket_id(ticket_id: &str) -> String {
    let sanitized: String = ticket_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}
