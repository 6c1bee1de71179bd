//! Outbound (Driven) ports for the Donor Registry subsystem.

use async_trait::async_trait;
use shared_types::{CareResult, UserId};

use crate::domain::{DonorProfile, DonorRecord};

/// Edit applied to one donor record under the store's row lock.
///
/// Returning an error discards every change the closure made.
pub type DonorMutation<'a> = Box<dyn FnOnce(&mut DonorRecord) -> CareResult<()> + Send + 'a>;

/// Store for donor profiles and their child rows.
#[async_trait]
pub trait DonorRepository: Send + Sync {
    /// Inserts an empty profile. Returns `false` when one already exists.
    async fn create_profile(&self, profile: DonorProfile) -> CareResult<bool>;

    async fn load(&self, donor_id: UserId) -> CareResult<Option<DonorRecord>>;

    /// Applies `mutation` atomically and returns the committed record.
    ///
    /// A donor without a stored record starts from an empty one, which is
    /// only written if the mutation succeeds.
    ///
    /// # Errors
    /// - `Conflict`: the same organ appears twice
    /// - `Validation`: a living-donation row names a non-eligible organ
    /// - whatever `mutation` returns, with the record left unchanged
    async fn update<'a>(&self, donor_id: UserId, mutation: DonorMutation<'a>)
        -> CareResult<DonorRecord>;

    /// Records of donors whose consent is currently given.
    async fn consenting(&self) -> CareResult<Vec<DonorRecord>>;
}
