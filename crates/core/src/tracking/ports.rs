//! Port interfaces for ticket metadata

use async_trait::async_trait;
use timeloom_domain::Result;

/// Ticket metadata supplied by the external ticket system.
#[derive(Debug, Clone)]
pub struct TicketMetadata {
    pub status: String,
    pub assignee: String,
}

/// Trait for fetching ticket metadata on demand.
///
/// Consulted only at session start to build the immutable ticket snapshot;
/// the backing service (Jira or similar) is a black box behind this trait.
#[async_trait]
pub trait TicketMetadataSource: Send + Sync {
    /// Fetch the current status and assignee of a ticket.
    async fn fetch(&self, ticket_id: &str) -> Result<TicketMetadata>;
}
