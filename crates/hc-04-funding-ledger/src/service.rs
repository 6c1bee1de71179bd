//! Funding Ledger Service.

use std::sync::Arc;

use async_trait::async_trait;
use hc_03_cases::{CaseRepository, CaseStatus};
use hc_05_access_policy::rules;
use shared_types::{
    record_best_effort, Actor, Amount, AuditAction, AuditEntry, AuditSink, Audited, CareError,
    CareResult, CaseId, TimeSource, UserId,
};
use tracing::{info, instrument};

use crate::domain::{ContributionReceipt, FundingContribution, SponsorLedger};
use crate::ports::{FundingApi, FundingStore};

/// Funding ledger over a contribution store, reading cases for access checks.
pub struct FundingLedger<S, R>
where
    S: FundingStore,
    R: CaseRepository,
{
    store: Arc<S>,
    cases: Arc<R>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn TimeSource>,
}

impl<S, R> FundingLedger<S, R>
where
    S: FundingStore,
    R: CaseRepository,
{
    pub fn new(
        store: Arc<S>,
        cases: Arc<R>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            store,
            cases,
            audit,
            clock,
        }
    }
}

#[async_trait]
impl<S, R> FundingApi for FundingLedger<S, R>
where
    S: FundingStore,
    R: CaseRepository,
{
    #[instrument(skip(self, actor), fields(sponsor_id = %actor.user_id, case_id = %case_id))]
    async fn contribute(
        &self,
        actor: &Actor,
        case_id: CaseId,
        amount: Amount,
    ) -> CareResult<Audited<ContributionReceipt>> {
        rules::funding::contribute(actor).require(actor, "contribute funding")?;

        let now = self.clock.now();
        let contribution = FundingContribution::new(case_id, actor.user_id, amount, now)?;
        let receipt = self.store.append(contribution).await?;

        care_telemetry::CONTRIBUTIONS.inc();
        care_telemetry::FUNDS_CONTRIBUTED.inc_by(amount as f64);
        if let Some(from) = receipt.flipped_from {
            care_telemetry::CASE_TRANSITIONS
                .with_label_values(&[from.as_str(), CaseStatus::Funded.as_str()])
                .inc();
        }
        info!(
            amount,
            funding_amount = receipt.funding_amount,
            funding_goal = receipt.funding_goal,
            funded = receipt.flipped_from.is_some(),
            "Contribution recorded"
        );

        let mut entry = AuditEntry::new(actor, AuditAction::FundingContributed, now)
            .with_case(case_id)
            .with_amount(amount)
            .with_metadata("funding_amount", receipt.funding_amount);
        if let Some(from) = receipt.flipped_from {
            entry = entry.with_metadata("status_from", from.as_str());
        }
        let audit = record_best_effort(self.audit.as_ref(), entry).await;

        Ok(Audited {
            value: receipt,
            audit,
        })
    }

    async fn case_history(
        &self,
        actor: &Actor,
        case_id: CaseId,
    ) -> CareResult<Vec<FundingContribution>> {
        let case = self
            .cases
            .get(case_id)
            .await?
            .ok_or_else(|| CareError::not_found("case", case_id))?;
        rules::funding::read_case_ledger(actor, &case.scope())
            .require(actor, "read this case's funding")?;
        self.store.contributions_for_case(case_id).await
    }

    async fn sponsor_history(&self, actor: &Actor, sponsor_id: UserId) -> CareResult<SponsorLedger> {
        rules::funding::read_sponsor_history(actor, sponsor_id)
            .require(actor, "read this sponsor's contributions")?;
        Ok(SponsorLedger {
            totals: self.store.sponsor_totals(sponsor_id).await?,
            contributions: self.store.contributions_by_sponsor(sponsor_id).await?,
        })
    }
}
