//! In-memory donor record store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{CareError, CareResult, UserId};

use crate::domain::{DonorProfile, DonorRecord};
use crate::ports::{DonorMutation, DonorRepository};

/// Donor records keyed by donor id. Every write holds the map's write lock.
#[derive(Default)]
pub struct InMemoryDonorRepository {
    records: RwLock<HashMap<UserId, DonorRecord>>,
}

impl InMemoryDonorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_constraints(record: &DonorRecord) -> CareResult<()> {
    let mut seen = HashSet::new();
    for row in &record.organs {
        if row.donor_id != record.profile.donor_id {
            return Err(CareError::conflict("organ row belongs to another donor"));
        }
        if !seen.insert(row.organ) {
            return Err(CareError::conflict(format!(
                "organ {} is already registered for this donor",
                row.organ
            )));
        }
        if row.is_living_donation && !row.organ.is_living_eligible() {
            return Err(CareError::field(
                "organs",
                format!("{} cannot be donated by a living donor", row.organ),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl DonorRepository for InMemoryDonorRepository {
    async fn create_profile(&self, profile: DonorProfile) -> CareResult<bool> {
        let mut records = self.records.write();
        if records.contains_key(&profile.donor_id) {
            return Ok(false);
        }
        let mut record = DonorRecord::empty(profile.donor_id);
        record.profile = profile;
        records.insert(record.profile.donor_id, record);
        Ok(true)
    }

    async fn load(&self, donor_id: UserId) -> CareResult<Option<DonorRecord>> {
        Ok(self.records.read().get(&donor_id).cloned())
    }

    async fn update<'a>(
        &self,
        donor_id: UserId,
        mutation: DonorMutation<'a>,
    ) -> CareResult<DonorRecord> {
        let mut records = self.records.write();
        let mut draft = records
            .get(&donor_id)
            .cloned()
            .unwrap_or_else(|| DonorRecord::empty(donor_id));
        mutation(&mut draft)?;
        if draft.profile.donor_id != donor_id {
            return Err(CareError::conflict("record belongs to another donor"));
        }
        check_constraints(&draft)?;
        records.insert(donor_id, draft.clone());
        Ok(draft)
    }

    async fn consenting(&self) -> CareResult<Vec<DonorRecord>> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|r| r.profile.consent_given)
            .cloned()
            .collect())
    }
}
