//! # CareBridge Facade
//!
//! One entry point per user-facing operation. Each call forwards to the
//! owning service; a few compose two services:
//!
//! | Operation | Composition |
//! |-----------|-------------|
//! | `sign_up` | identity, then an empty donor profile for donors |
//! | `match_donor` | reserve the donor's organ, then the case transition; released again if the transition fails |
//! | `set_case_status` | the case transition, then `transplanted` marks the matched organ donated |
//!
//! The facade never makes authorization decisions of its own; every rule
//! lives in the services it calls.

use std::sync::Arc;

use hc_01_identity::{Credentials, IdentityApi, Profile, ProfileUpdate, SignUp, User};
use hc_02_donor_registry::{
    DonorProfile, DonorRecord, DonorRegistration, DonorRegistryApi, DonorSummary, DonorType,
    EmergencyContact, Registered,
};
use hc_03_cases::{
    CaseApi, CaseFilter, CaseStatus, CaseUpdate, CaseView, FileRef, FileUpload, MatchRequest,
    NewCase,
};
use hc_04_funding_ledger::{ContributionReceipt, FundingApi, FundingContribution, SponsorLedger};
use hc_06_audit_log::{AuditLogApi, AuditQuery};
use shared_types::{
    Actor, Amount, AuditEntry, Audited, CareResult, CaseId, Organ, Role, UserId,
};
use tracing::{info, instrument, warn};

use crate::container::ServiceContainer;

/// Role-checked operations over the wired services.
#[derive(Clone)]
pub struct CareApi {
    container: Arc<ServiceContainer>,
}

impl CareApi {
    pub fn new(container: Arc<ServiceContainer>) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// Creates the configured admin account if one is configured.
    ///
    /// Idempotent: an existing admin with the same email is returned as is.
    pub async fn bootstrap_admin(&self) -> CareResult<Option<User>> {
        let bootstrap = &self.container.config.bootstrap;
        let (Some(email), Some(password)) = (&bootstrap.admin_email, &bootstrap.admin_password)
        else {
            warn!("No bootstrap admin configured; approvals need an existing admin");
            return Ok(None);
        };
        let admin = self
            .container
            .identity
            .provision_admin(email, password, &bootstrap.admin_name)
            .await?;
        info!(user_id = %admin.id, "Bootstrap admin ready");
        Ok(Some(admin))
    }

    // =========================================================================
    // IDENTITY
    // =========================================================================

    /// Registers an account. Donors also get an empty donor profile.
    #[instrument(skip(self, request), fields(role = %request.role))]
    pub async fn sign_up(&self, request: SignUp) -> CareResult<Audited<User>> {
        let created = self.container.identity.sign_up(request).await?;
        if created.value.role == Role::Donor {
            self.container.donors.create_profile(created.value.id).await?;
        }
        Ok(created)
    }

    pub async fn authenticate(&self, credentials: Credentials) -> CareResult<Actor> {
        self.container.identity.authenticate(credentials).await
    }

    /// Re-reads the caller's role and approval, e.g. after an admin approval.
    pub async fn refresh_actor(&self, user_id: UserId) -> CareResult<Actor> {
        self.container.identity.resolve_actor(user_id).await
    }

    pub async fn approve_user(&self, actor: &Actor, user_id: UserId) -> CareResult<Audited<User>> {
        self.container.identity.approve_user(actor, user_id).await
    }

    pub async fn list_pending_approvals(&self, actor: &Actor) -> CareResult<Vec<User>> {
        self.container.identity.list_pending_approvals(actor).await
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> CareResult<Audited<(User, Profile)>> {
        self.container.identity.update_profile(actor, update).await
    }

    pub async fn get_profile(&self, actor: &Actor, user_id: UserId) -> CareResult<(User, Profile)> {
        self.container.identity.get_profile(actor, user_id).await
    }

    // =========================================================================
    // DONOR REGISTRY
    // =========================================================================

    pub async fn register_donor(
        &self,
        actor: &Actor,
        registration: DonorRegistration,
    ) -> CareResult<Audited<Registered>> {
        self.container.donors.register(actor, registration).await
    }

    pub async fn give_consent(
        &self,
        actor: &Actor,
        donor_type: Option<DonorType>,
    ) -> CareResult<Audited<DonorProfile>> {
        self.container.donors.give_consent(actor, donor_type).await
    }

    pub async fn withdraw_consent(&self, actor: &Actor) -> CareResult<Audited<DonorProfile>> {
        self.container.donors.withdraw_consent(actor).await
    }

    pub async fn donor_record(&self, actor: &Actor, donor_id: UserId) -> CareResult<DonorRecord> {
        self.container.donors.get_record(actor, donor_id).await
    }

    pub async fn emergency_contacts(
        &self,
        actor: &Actor,
        donor_id: UserId,
    ) -> CareResult<Vec<EmergencyContact>> {
        self.container.donors.list_contacts(actor, donor_id).await
    }

    pub async fn available_donors(&self, actor: &Actor) -> CareResult<Vec<DonorSummary>> {
        self.container.donors.list_available_donors(actor).await
    }

    // =========================================================================
    // CASES
    // =========================================================================

    pub async fn create_case(&self, actor: &Actor, new_case: NewCase) -> CareResult<Audited<CaseView>> {
        self.container.cases.create_case(actor, new_case).await
    }

    pub async fn update_case(
        &self,
        actor: &Actor,
        case_id: CaseId,
        update: CaseUpdate,
    ) -> CareResult<Audited<CaseView>> {
        self.container.cases.update_case(actor, case_id, update).await
    }

    pub async fn attach_file(
        &self,
        actor: &Actor,
        case_id: CaseId,
        upload: FileUpload,
    ) -> CareResult<Audited<FileRef>> {
        self.container.cases.attach_file(actor, case_id, upload).await
    }

    pub async fn assign_hospital(
        &self,
        actor: &Actor,
        case_id: CaseId,
        hospital_id: UserId,
    ) -> CareResult<Audited<CaseView>> {
        self.container
            .cases
            .assign_hospital(actor, case_id, hospital_id)
            .await
    }

    /// Records a donor match.
    ///
    /// A named donor's organ is reserved before the case moves, so two cases
    /// can never hold the same organ. The reservation is released when the
    /// case transition fails, and a donor replaced by this match gets their
    /// organ back.
    ///
    /// # Errors
    /// - `Validation` on `donor_id`: the donor is not available for this organ
    /// - anything [`CaseApi::match_donor`] returns
    #[instrument(skip(self, actor, request), fields(case_id = %case_id))]
    pub async fn match_donor(
        &self,
        actor: &Actor,
        case_id: CaseId,
        request: MatchRequest,
    ) -> CareResult<Audited<CaseView>> {
        let Some(donor_id) = request.donor_id else {
            return self.container.cases.match_donor(actor, case_id, request).await;
        };

        let case = self.container.cases.get_case(actor, case_id).await?;
        let organ = case.organ_needed;
        if case.matched_donor_id == Some(donor_id) {
            return self.container.cases.match_donor(actor, case_id, request).await;
        }

        self.container
            .donors
            .reserve_organ(actor, donor_id, organ)
            .await?;
        let matched = match self.container.cases.match_donor(actor, case_id, request).await {
            Ok(matched) => matched,
            Err(err) => {
                self.release_quietly(actor, donor_id, organ).await;
                return Err(err);
            }
        };
        if let Some(previous) = case.matched_donor_id {
            self.release_quietly(actor, previous, organ).await;
        }
        Ok(matched)
    }

    async fn release_quietly(&self, actor: &Actor, donor_id: UserId, organ: Organ) {
        if let Err(err) = self
            .container
            .donors
            .release_organ(actor, donor_id, organ)
            .await
        {
            warn!(
                donor_id = %donor_id,
                organ = organ.as_str(),
                error = %err,
                "Organ release failed"
            );
        }
    }

    /// Moves a case along its lifecycle. A transplant marks the matched
    /// donor's organ as donated.
    #[instrument(skip(self, actor), fields(case_id = %case_id, status = status.as_str()))]
    pub async fn set_case_status(
        &self,
        actor: &Actor,
        case_id: CaseId,
        status: CaseStatus,
    ) -> CareResult<Audited<CaseView>> {
        let changed = self.container.cases.set_status(actor, case_id, status).await?;
        if changed.value.status == CaseStatus::Transplanted {
            if let Some(donor_id) = changed.value.matched_donor_id {
                let organ = changed.value.organ_needed;
                if let Err(err) = self
                    .container
                    .donors
                    .mark_donated(actor, donor_id, organ)
                    .await
                {
                    warn!(
                        donor_id = %donor_id,
                        organ = organ.as_str(),
                        error = %err,
                        "Could not mark organ donated"
                    );
                }
            }
        }
        Ok(changed)
    }

    pub async fn get_case(&self, actor: &Actor, case_id: CaseId) -> CareResult<CaseView> {
        self.container.cases.get_case(actor, case_id).await
    }

    pub async fn list_cases(&self, actor: &Actor, filter: CaseFilter) -> CareResult<Vec<CaseView>> {
        self.container.cases.list_cases(actor, filter).await
    }

    // =========================================================================
    // FUNDING
    // =========================================================================

    pub async fn contribute(
        &self,
        actor: &Actor,
        case_id: CaseId,
        amount: Amount,
    ) -> CareResult<Audited<ContributionReceipt>> {
        self.container.funding.contribute(actor, case_id, amount).await
    }

    pub async fn case_funding(
        &self,
        actor: &Actor,
        case_id: CaseId,
    ) -> CareResult<Vec<FundingContribution>> {
        self.container.funding.case_history(actor, case_id).await
    }

    pub async fn sponsor_funding(
        &self,
        actor: &Actor,
        sponsor_id: UserId,
    ) -> CareResult<SponsorLedger> {
        self.container.funding.sponsor_history(actor, sponsor_id).await
    }

    // =========================================================================
    // AUDIT
    // =========================================================================

    pub async fn audit_log(&self, actor: &Actor, query: AuditQuery) -> CareResult<Vec<AuditEntry>> {
        self.container.audit_log.fetch(actor, query).await
    }
}
