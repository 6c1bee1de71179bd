//! # Inbound Port - CaseApi
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `create_case` | patient |
//! | `update_case` | owning patient |
//! | `attach_file` | owning patient |
//! | `assign_hospital` | approved hospital (unassigned or own), admin |
//! | `match_donor` | approved hospital (unassigned or own), admin |
//! | `set_status` | approved hospital (unassigned or own), admin |
//! | `get_case` / `list_cases` | any role, rows filtered and redacted |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Actor, Audited, CareResult, CaseId, UserId};

use crate::domain::{CaseFilter, CaseStatus, CaseUpdate, CaseView, FileRef, FileUpload, NewCase};

/// Donor and/or hospital to record on a case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRequest {
    pub donor_id: Option<UserId>,
    pub hospital_id: Option<UserId>,
}

impl MatchRequest {
    pub fn donor(donor_id: UserId) -> Self {
        Self {
            donor_id: Some(donor_id),
            hospital_id: None,
        }
    }
}

#[async_trait]
pub trait CaseApi: Send + Sync {
    /// Creates a case in `waiting` with zero funding. Files are uploaded
    /// first and stored with the case row in one insert.
    ///
    /// # Errors
    /// - `Validation`: organ or urgency missing or unknown, file too large
    /// - `Forbidden`: caller is not a patient
    async fn create_case(&self, actor: &Actor, new_case: NewCase) -> CareResult<Audited<CaseView>>;

    /// # Errors
    /// - `Conflict`: the case is transplanted
    async fn update_case(
        &self,
        actor: &Actor,
        case_id: CaseId,
        update: CaseUpdate,
    ) -> CareResult<Audited<CaseView>>;

    async fn attach_file(
        &self,
        actor: &Actor,
        case_id: CaseId,
        upload: FileUpload,
    ) -> CareResult<Audited<FileRef>>;

    /// Hospitals may only assign themselves.
    async fn assign_hospital(
        &self,
        actor: &Actor,
        case_id: CaseId,
        hospital_id: UserId,
    ) -> CareResult<Audited<CaseView>>;

    /// Records the match and moves a waiting case to `matched`.
    async fn match_donor(
        &self,
        actor: &Actor,
        case_id: CaseId,
        request: MatchRequest,
    ) -> CareResult<Audited<CaseView>>;

    /// # Errors
    /// - `Conflict`: illegal transition
    async fn set_status(
        &self,
        actor: &Actor,
        case_id: CaseId,
        status: CaseStatus,
    ) -> CareResult<Audited<CaseView>>;

    async fn get_case(&self, actor: &Actor, case_id: CaseId) -> CareResult<CaseView>;

    /// Visible cases, most urgent first.
    async fn list_cases(&self, actor: &Actor, filter: CaseFilter) -> CareResult<Vec<CaseView>>;
}
