//! Ticket metadata source for hosts without a ticket backend

use async_trait::async_trait;
use timeloom_core::tracking::ports::{TicketMetadata, TicketMetadataSource};
use timeloom_domain::Result;

/// Always reports an unknown status and assignee.
///
/// Used when no ticket system is wired in; the session snapshot then
/// matches the work-log fallback values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTicketMetadataSource;

#[async_trait]
impl TicketMetadataSource for NullTicketMetadataSource {
    async fn fetch(&self, _ticket_id: &str) -> Result<TicketMetadata> {
        Ok(TicketMetadata { status: "unknown".to_string(), assignee: "unknown".to_string() })
    }
}
