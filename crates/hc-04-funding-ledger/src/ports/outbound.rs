//! Outbound (Driven) ports for the Funding Ledger.

use async_trait::async_trait;
use shared_types::{CareResult, CaseId, UserId};

use crate::domain::{ContributionReceipt, FundingContribution, SponsorTotals};

/// Contribution store.
///
/// `append` is one atomic unit: the ledger row, the case funding increment,
/// the conditional flip to `funded` and the sponsor totals are committed
/// together or not at all.
#[async_trait]
pub trait FundingStore: Send + Sync {
    /// # Errors
    /// - `NotFound`: the case does not exist
    /// - `Validation` on `amount`: the case or sponsor total would overflow
    async fn append(&self, contribution: FundingContribution) -> CareResult<ContributionReceipt>;

    /// Oldest first.
    async fn contributions_for_case(&self, case_id: CaseId) -> CareResult<Vec<FundingContribution>>;

    /// Oldest first.
    async fn contributions_by_sponsor(
        &self,
        sponsor_id: UserId,
    ) -> CareResult<Vec<FundingContribution>>;

    async fn sponsor_totals(&self, sponsor_id: UserId) -> CareResult<SponsorTotals>;
}
