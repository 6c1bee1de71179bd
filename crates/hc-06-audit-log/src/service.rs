//! Audit Log Service - the shared audit sink and admin queries.

use std::sync::Arc;

use async_trait::async_trait;
use hc_05_access_policy::rules;
use shared_types::{Actor, AuditEntry, AuditSink, CareResult};
use tracing::{debug, trace};

use crate::domain::AuditQuery;
use crate::ports::{AuditLogApi, AuditRepository};

/// Audit log over an append-only repository.
pub struct AuditLogService<A>
where
    A: AuditRepository,
{
    entries: Arc<A>,
}

impl<A> AuditLogService<A>
where
    A: AuditRepository,
{
    pub fn new(entries: Arc<A>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl<A> AuditSink for AuditLogService<A>
where
    A: AuditRepository,
{
    async fn append(&self, entry: AuditEntry) -> CareResult<()> {
        let action = entry.action;
        self.entries.append(entry).await?;
        care_telemetry::AUDIT_ENTRIES.inc();
        trace!(action = action.as_str(), "Audit entry appended");
        Ok(())
    }
}

#[async_trait]
impl<A> AuditLogApi for AuditLogService<A>
where
    A: AuditRepository,
{
    async fn fetch(&self, actor: &Actor, query: AuditQuery) -> CareResult<Vec<AuditEntry>> {
        rules::audit::query(actor).require(actor, "read the audit log")?;
        let rows = self.entries.query(&query).await?;
        debug!(admin = %actor.user_id, rows = rows.len(), "Audit log queried");
        Ok(rows)
    }
}
