//! Port interfaces for work-log persistence

use async_trait::async_trait;
use timeloom_domain::{Result, TaskManifest};

/// Trait for persisting per-ticket manifests.
///
/// Writes must be atomic (a reader never observes a partially-written
/// manifest); there is no cross-process locking, so concurrent writers are
/// last-writer-wins.
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Load the manifest for a ticket, if one exists.
    async fn load(&self, ticket_id: &str) -> Result<Option<TaskManifest>>;

    /// Atomically overwrite the manifest for `manifest.ticket_id`.
    async fn save(&self, manifest: &TaskManifest) -> Result<()>;

    /// Load every manifest in the store.
    async fn load_all(&self) -> Result<Vec<TaskManifest>>;
}
