//! In-memory audit table.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{AuditEntry, CareResult};

use crate::domain::AuditQuery;
use crate::ports::AuditRepository;

/// Entries in append order.
#[derive(Default)]
pub struct InMemoryAuditRepository {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append(&self, entry: AuditEntry) -> CareResult<()> {
        self.entries.write().push(entry);
        Ok(())
    }

    async fn query(&self, query: &AuditQuery) -> CareResult<Vec<AuditEntry>> {
        Ok(self
            .entries
            .read()
            .iter()
            .rev()
            .filter(|e| query.matches(e))
            .take(query.effective_limit())
            .cloned()
            .collect())
    }
}
