//! In-memory case store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{CareError, CareResult, CaseId};

use crate::domain::Case;
use crate::ports::{CaseMutation, CaseRepository};

/// Case table keyed by id. Updates run under the table's write lock.
#[derive(Default)]
pub struct InMemoryCaseRepository {
    cases: RwLock<HashMap<CaseId, Case>>,
}

impl InMemoryCaseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cases.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CaseRepository for InMemoryCaseRepository {
    async fn insert(&self, case: Case) -> CareResult<()> {
        let mut cases = self.cases.write();
        if cases.contains_key(&case.id) {
            return Err(CareError::conflict(format!("case {} already exists", case.id)));
        }
        cases.insert(case.id, case);
        Ok(())
    }

    async fn get(&self, case_id: CaseId) -> CareResult<Option<Case>> {
        Ok(self.cases.read().get(&case_id).cloned())
    }

    async fn update<'a>(&self, case_id: CaseId, mutation: CaseMutation<'a>) -> CareResult<Case> {
        let mut cases = self.cases.write();
        let row = cases
            .get_mut(&case_id)
            .ok_or_else(|| CareError::not_found("case", case_id))?;
        let mut draft = row.clone();
        mutation(&mut draft)?;
        *row = draft.clone();
        Ok(draft)
    }

    async fn list(&self) -> CareResult<Vec<Case>> {
        Ok(self.cases.read().values().cloned().collect())
    }
}
