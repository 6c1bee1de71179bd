//! Outbound (Driven) ports for the Audit Log.

use async_trait::async_trait;
use shared_types::{AuditEntry, CareResult};

use crate::domain::AuditQuery;

/// Append-only entry store. There is no update or delete.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> CareResult<()>;

    /// Matching entries, newest first, at most `query.effective_limit()`.
    async fn query(&self, query: &AuditQuery) -> CareResult<Vec<AuditEntry>>;
}
