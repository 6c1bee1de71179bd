//! Funding ledger entities.

use serde::{Deserialize, Serialize};
use shared_types::{Amount, CareError, CareResult, CaseId, ContributionId, Timestamp, UserId};

use hc_03_cases::CaseStatus;

/// One sponsor contribution. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingContribution {
    pub id: ContributionId,
    pub case_id: CaseId,
    pub sponsor_id: UserId,
    pub amount: Amount,
    pub created_at: Timestamp,
}

impl FundingContribution {
    /// # Errors
    /// - `Validation`: `amount` is zero or negative
    pub fn new(
        case_id: CaseId,
        sponsor_id: UserId,
        amount: Amount,
        created_at: Timestamp,
    ) -> CareResult<Self> {
        if amount <= 0 {
            return Err(CareError::field("amount", "must be greater than zero"));
        }
        Ok(Self {
            id: ContributionId::new(),
            case_id,
            sponsor_id,
            amount,
            created_at,
        })
    }
}

/// Running totals per sponsor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorTotals {
    pub sponsor_id: UserId,
    pub total_funded: Amount,
    /// Number of contributions made.
    pub funded_count: u64,
}

impl SponsorTotals {
    pub fn empty(sponsor_id: UserId) -> Self {
        Self {
            sponsor_id,
            total_funded: 0,
            funded_count: 0,
        }
    }

    /// # Errors
    /// - `Validation` on `amount`: the sponsor total would overflow
    pub fn record(&mut self, amount: Amount) -> CareResult<()> {
        self.total_funded = self
            .total_funded
            .checked_add(amount)
            .ok_or_else(|| CareError::field("amount", "would overflow the sponsor's funding total"))?;
        self.funded_count += 1;
        Ok(())
    }
}

/// What a committed contribution did to its case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionReceipt {
    pub contribution: FundingContribution,
    /// Case funding after this contribution.
    pub funding_amount: Amount,
    pub funding_goal: Amount,
    pub status: CaseStatus,
    /// Set when this contribution moved the case to `funded`.
    pub flipped_from: Option<CaseStatus>,
}

/// A sponsor's contributions and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorLedger {
    pub totals: SponsorTotals,
    pub contributions: Vec<FundingContribution>,
}
