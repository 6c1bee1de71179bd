//! # Inbound Port - DonorRegistryApi
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `create_profile` | runtime, on donor sign-up |
//! | `register` | the donor |
//! | `give_consent` | the donor |
//! | `withdraw_consent` | the donor |
//! | `get_record` | the donor, admin |
//! | `list_contacts` | the donor, admin |
//! | `list_available_donors` | approved hospital, admin |
//! | `reserve_organ` | approved hospital, admin |
//! | `release_organ` | approved hospital, admin |
//! | `mark_donated` | approved hospital, admin |

use async_trait::async_trait;
use shared_types::{Actor, Audited, CareResult, Organ, UserId};

use crate::domain::{
    Advisory, DonorOrgan, DonorProfile, DonorRecord, DonorRegistration, DonorSummary, DonorType,
    EmergencyContact,
};

/// Saved registration plus any non-blocking advisories.
#[derive(Debug, Clone)]
pub struct Registered {
    pub record: DonorRecord,
    pub advisories: Vec<Advisory>,
}

#[async_trait]
pub trait DonorRegistryApi: Send + Sync {
    /// Creates the empty consent row for a new donor. Idempotent.
    async fn create_profile(&self, donor_id: UserId) -> CareResult<DonorProfile>;

    /// Saves medical info, organs and contacts, replacing earlier rows.
    ///
    /// # Errors
    /// - `Validation`: missing type-specific fields, ineligible living organ
    /// - `Forbidden`: caller is not the donor
    async fn register(
        &self,
        actor: &Actor,
        registration: DonorRegistration,
    ) -> CareResult<Audited<Registered>>;

    /// Gives consent. `None` reuses the stored donor type; a new type
    /// re-derives every organ row's living-donation flag.
    ///
    /// # Errors
    /// - `Validation`: no donor type, or the stored record is not ready
    async fn give_consent(
        &self,
        actor: &Actor,
        donor_type: Option<DonorType>,
    ) -> CareResult<Audited<DonorProfile>>;

    /// Withdraws consent. Idempotent while `can_withdraw` holds.
    ///
    /// # Errors
    /// - `Conflict`: `can_withdraw` is false
    async fn withdraw_consent(&self, actor: &Actor) -> CareResult<Audited<DonorProfile>>;

    async fn get_record(&self, actor: &Actor, donor_id: UserId) -> CareResult<DonorRecord>;

    async fn list_contacts(
        &self,
        actor: &Actor,
        donor_id: UserId,
    ) -> CareResult<Vec<EmergencyContact>>;

    /// Consenting donors without medical info.
    async fn list_available_donors(&self, actor: &Actor) -> CareResult<Vec<DonorSummary>>;

    /// Marks the donor's `organ` as matched to a case.
    ///
    /// # Errors
    /// - `Validation` on `donor_id`: no consent, organ not offered, or not available
    async fn reserve_organ(
        &self,
        actor: &Actor,
        donor_id: UserId,
        organ: Organ,
    ) -> CareResult<DonorOrgan>;

    /// Returns a matched organ to available. Idempotent.
    async fn release_organ(
        &self,
        actor: &Actor,
        donor_id: UserId,
        organ: Organ,
    ) -> CareResult<DonorOrgan>;

    /// Marks a matched organ as donated. Idempotent.
    ///
    /// # Errors
    /// - `Conflict`: the organ was never matched
    async fn mark_donated(
        &self,
        actor: &Actor,
        donor_id: UserId,
        organ: Organ,
    ) -> CareResult<DonorOrgan>;
}
