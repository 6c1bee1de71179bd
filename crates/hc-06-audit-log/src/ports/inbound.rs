//! # Inbound Port - AuditLogApi
//!
//! Appends arrive through [`AuditSink`](shared_types::AuditSink); reading is
//! admin only.

use async_trait::async_trait;
use shared_types::{Actor, AuditEntry, CareResult};

use crate::domain::AuditQuery;

#[async_trait]
pub trait AuditLogApi: Send + Sync {
    /// # Errors
    /// - `Forbidden`: caller is not an admin
    async fn fetch(&self, actor: &Actor, query: AuditQuery) -> CareResult<Vec<AuditEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // The trait must stay object-safe (usable as dyn AuditLogApi)
    fn _assert_object_safe(_: &dyn AuditLogApi) {}
}
