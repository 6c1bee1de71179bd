//! In-memory contribution store layered on a case store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hc_03_cases::{Case, CaseRepository};
use parking_lot::Mutex;
use shared_types::{CareResult, CaseId, UserId};

use crate::domain::{ContributionReceipt, FundingContribution, SponsorTotals};
use crate::ports::FundingStore;

#[derive(Default)]
struct Ledger {
    rows: Vec<FundingContribution>,
    totals: HashMap<UserId, SponsorTotals>,
}

/// Ledger rows and sponsor totals, committed inside the case row update.
///
/// Lock order is case row, then ledger.
pub struct InMemoryFundingStore<R>
where
    R: CaseRepository,
{
    cases: Arc<R>,
    ledger: Mutex<Ledger>,
}

impl<R> InMemoryFundingStore<R>
where
    R: CaseRepository,
{
    pub fn new(cases: Arc<R>) -> Self {
        Self {
            cases,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.ledger.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<R> FundingStore for InMemoryFundingStore<R>
where
    R: CaseRepository,
{
    async fn append(&self, contribution: FundingContribution) -> CareResult<ContributionReceipt> {
        let ledger = &self.ledger;
        let row = contribution.clone();
        let mut flipped_from = None;
        let case = self
            .cases
            .update(
                contribution.case_id,
                Box::new(|case: &mut Case| {
                    flipped_from = case.apply_funding(row.amount, row.created_at)?;
                    let mut ledger = ledger.lock();
                    let mut totals = ledger
                        .totals
                        .get(&row.sponsor_id)
                        .cloned()
                        .unwrap_or_else(|| SponsorTotals::empty(row.sponsor_id));
                    totals.record(row.amount)?;
                    ledger.totals.insert(row.sponsor_id, totals);
                    ledger.rows.push(row);
                    Ok(())
                }),
            )
            .await?;

        Ok(ContributionReceipt {
            contribution,
            funding_amount: case.funding_amount,
            funding_goal: case.funding_goal,
            status: case.status,
            flipped_from,
        })
    }

    async fn contributions_for_case(&self, case_id: CaseId) -> CareResult<Vec<FundingContribution>> {
        Ok(self
            .ledger
            .lock()
            .rows
            .iter()
            .filter(|c| c.case_id == case_id)
            .cloned()
            .collect())
    }

    async fn contributions_by_sponsor(
        &self,
        sponsor_id: UserId,
    ) -> CareResult<Vec<FundingContribution>> {
        Ok(self
            .ledger
            .lock()
            .rows
            .iter()
            .filter(|c| c.sponsor_id == sponsor_id)
            .cloned()
            .collect())
    }

    async fn sponsor_totals(&self, sponsor_id: UserId) -> CareResult<SponsorTotals> {
        Ok(self
            .ledger
            .lock()
            .totals
            .get(&sponsor_id)
            .cloned()
            .unwrap_or_else(|| SponsorTotals::empty(sponsor_id)))
    }
}
