//! Ownership facts the predicates evaluate.

use serde::{Deserialize, Serialize};
use shared_types::UserId;

/// Ownership relation of a case row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseScope {
    pub patient_id: UserId,
    pub assigned_hospital_id: Option<UserId>,
    pub matched_donor_id: Option<UserId>,
}

impl CaseScope {
    pub fn new(patient_id: UserId) -> Self {
        Self {
            patient_id,
            assigned_hospital_id: None,
            matched_donor_id: None,
        }
    }

    pub fn assigned_to(mut self, hospital_id: UserId) -> Self {
        self.assigned_hospital_id = Some(hospital_id);
        self
    }

    pub fn matched_with(mut self, donor_id: UserId) -> Self {
        self.matched_donor_id = Some(donor_id);
        self
    }

    /// Unassigned, or assigned to `hospital_id`.
    pub fn open_to_hospital(&self, hospital_id: UserId) -> bool {
        self.assigned_hospital_id
            .map_or(true, |assigned| assigned == hospital_id)
    }
}
