//! # Inbound Port - FundingApi
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `contribute` | approved sponsor |
//! | `case_history` | anyone who may read the case, except donors |
//! | `sponsor_history` | the sponsor, admin |

use async_trait::async_trait;
use shared_types::{Actor, Amount, Audited, CareResult, CaseId, UserId};

use crate::domain::{ContributionReceipt, FundingContribution, SponsorLedger};

#[async_trait]
pub trait FundingApi: Send + Sync {
    /// Appends a contribution and updates the case aggregate.
    ///
    /// # Errors
    /// - `Validation`: `amount <= 0`
    /// - `NotFound`: unknown case
    /// - `Forbidden`: caller is not an approved sponsor
    async fn contribute(
        &self,
        actor: &Actor,
        case_id: CaseId,
        amount: Amount,
    ) -> CareResult<Audited<ContributionReceipt>>;

    async fn case_history(
        &self,
        actor: &Actor,
        case_id: CaseId,
    ) -> CareResult<Vec<FundingContribution>>;

    async fn sponsor_history(&self, actor: &Actor, sponsor_id: UserId) -> CareResult<SponsorLedger>;
}
