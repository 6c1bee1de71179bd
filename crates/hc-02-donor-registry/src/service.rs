//! Donor Registry Service - registration, consent and donor discovery.

use std::sync::Arc;

use async_trait::async_trait;
use hc_05_access_policy::rules;
use shared_types::{
    record_best_effort, Actor, AuditAction, AuditEntry, AuditOutcome, AuditSink, Audited,
    CareError, CareResult, Organ, TimeSource, UserId,
};
use tracing::{debug, info, instrument};

use crate::domain::{
    allocation, consent, registration, Advisory, Allocation, ConsentChange, DonorOrgan,
    DonorProfile, DonorRecord, DonorRegistration, DonorSummary, DonorType, EmergencyContact,
};
use crate::ports::{DonorRegistryApi, DonorRepository, Registered};

type OrganTransition = fn(&mut DonorRecord, Organ) -> CareResult<Allocation>;

/// Donor registry over a donor record store.
pub struct DonorRegistryService<D>
where
    D: DonorRepository,
{
    donors: Arc<D>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn TimeSource>,
}

impl<D> DonorRegistryService<D>
where
    D: DonorRepository,
{
    pub fn new(donors: Arc<D>, audit: Arc<dyn AuditSink>, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            donors,
            audit,
            clock,
        }
    }

    /// Stored record, or an empty one when the profile row was never created.
    async fn record_or_empty(&self, donor_id: UserId) -> CareResult<DonorRecord> {
        Ok(self
            .donors
            .load(donor_id)
            .await?
            .unwrap_or_else(|| DonorRecord::empty(donor_id)))
    }

    fn count_change(change: ConsentChange) {
        if change != ConsentChange::Unchanged {
            care_telemetry::CONSENT_CHANGES
                .with_label_values(&[change.as_str()])
                .inc();
        }
    }

    /// Runs one organ transition under the record lock.
    async fn allocate(
        &self,
        actor: &Actor,
        donor_id: UserId,
        organ: Organ,
        transition: OrganTransition,
    ) -> CareResult<DonorOrgan> {
        rules::donor::allocate_organ(actor).require(actor, "allocate donor organs")?;

        let mut outcome = Allocation::Unchanged;
        let record = self
            .donors
            .update(
                donor_id,
                Box::new(|record: &mut DonorRecord| {
                    outcome = transition(record, organ)?;
                    Ok(())
                }),
            )
            .await?;
        let row = record
            .organs
            .into_iter()
            .find(|o| o.organ == organ)
            .ok_or_else(|| CareError::not_found("donor organ", organ))?;

        if outcome == Allocation::Changed {
            care_telemetry::ORGAN_TRANSITIONS
                .with_label_values(&[row.status.as_str()])
                .inc();
            info!(
                donor_id = %donor_id,
                organ = organ.as_str(),
                status = row.status.as_str(),
                "Organ status changed"
            );
        }
        Ok(row)
    }
}

#[async_trait]
impl<D> DonorRegistryApi for DonorRegistryService<D>
where
    D: DonorRepository,
{
    async fn create_profile(&self, donor_id: UserId) -> CareResult<DonorProfile> {
        if self.donors.create_profile(DonorProfile::new(donor_id)).await? {
            debug!(donor_id = %donor_id, "Created donor profile");
        }
        Ok(self.record_or_empty(donor_id).await?.profile)
    }

    #[instrument(skip(self, actor, form), fields(donor_id = %actor.user_id))]
    async fn register(
        &self,
        actor: &Actor,
        form: DonorRegistration,
    ) -> CareResult<Audited<Registered>> {
        rules::donor::write_record(actor, actor.user_id).require(actor, "edit this donor record")?;

        let now = self.clock.now();
        let mut advisories: Vec<Advisory> = Vec::new();
        let mut change = ConsentChange::Unchanged;
        let record = self
            .donors
            .update(
                actor.user_id,
                Box::new(|record: &mut DonorRecord| {
                    let (mut built, notes) =
                        form.build(record, now).map_err(CareError::Validation)?;
                    if form.give_consent {
                        if let Some(donor_type) = built.profile.donor_type {
                            change = consent::give(&mut built.profile, donor_type, now);
                        }
                    }
                    advisories = notes;
                    *record = built;
                    Ok(())
                }),
            )
            .await?;
        Self::count_change(change);

        let donor_type = record
            .profile
            .donor_type
            .map(DonorType::as_str)
            .unwrap_or_default();
        info!(
            donor_type,
            organs = record.organs.len(),
            consent = record.profile.consent_given,
            advisories = advisories.len(),
            "Donor registered"
        );

        let mut entry = AuditEntry::new(actor, AuditAction::DonorRegistered, now)
            .with_donor_type(donor_type)
            .with_metadata(
                "organs",
                record
                    .organs
                    .iter()
                    .map(|o| o.organ.as_str())
                    .collect::<Vec<_>>(),
            )
            .with_metadata("contacts", record.contacts.len());
        if change == ConsentChange::Given {
            entry = entry.with_metadata("consent", change.as_str());
        }
        let audit = record_best_effort(self.audit.as_ref(), entry).await;

        Ok(Audited {
            value: Registered { record, advisories },
            audit,
        })
    }

    #[instrument(skip(self, actor), fields(donor_id = %actor.user_id))]
    async fn give_consent(
        &self,
        actor: &Actor,
        donor_type: Option<DonorType>,
    ) -> CareResult<Audited<DonorProfile>> {
        rules::donor::write_record(actor, actor.user_id).require(actor, "give consent")?;

        let now = self.clock.now();
        let mut change = ConsentChange::Unchanged;
        let record = self
            .donors
            .update(
                actor.user_id,
                Box::new(|record: &mut DonorRecord| {
                    let donor_type = donor_type
                        .or(record.profile.donor_type)
                        .ok_or_else(|| CareError::field("donor_type", "is required"))?;
                    let advisories = registration::assess(donor_type, record).into_result()?;
                    if !advisories.is_empty() {
                        debug!(count = advisories.len(), "Consent given with advisories");
                    }
                    change = consent::give(&mut record.profile, donor_type, now);
                    record.align_organs();
                    Ok(())
                }),
            )
            .await?;

        if change == ConsentChange::Unchanged {
            return Ok(Audited {
                value: record.profile,
                audit: AuditOutcome::Skipped,
            });
        }
        Self::count_change(change);

        let donor_type = record
            .profile
            .donor_type
            .map(DonorType::as_str)
            .unwrap_or_default();
        info!(donor_type, "Consent given");

        let audit = record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(actor, AuditAction::ConsentGiven, now).with_donor_type(donor_type),
        )
        .await;

        Ok(Audited {
            value: record.profile,
            audit,
        })
    }

    #[instrument(skip(self, actor), fields(donor_id = %actor.user_id))]
    async fn withdraw_consent(&self, actor: &Actor) -> CareResult<Audited<DonorProfile>> {
        rules::donor::write_record(actor, actor.user_id).require(actor, "withdraw consent")?;

        let mut change = ConsentChange::Unchanged;
        let record = self
            .donors
            .update(
                actor.user_id,
                Box::new(|record: &mut DonorRecord| {
                    change = consent::withdraw(&mut record.profile)?;
                    Ok(())
                }),
            )
            .await?;

        if change == ConsentChange::Unchanged {
            return Ok(Audited {
                value: record.profile,
                audit: AuditOutcome::Skipped,
            });
        }
        Self::count_change(change);
        info!("Consent withdrawn");

        let mut entry = AuditEntry::new(actor, AuditAction::ConsentWithdrawn, self.clock.now());
        if let Some(donor_type) = record.profile.donor_type {
            entry = entry.with_donor_type(donor_type.as_str());
        }
        let audit = record_best_effort(self.audit.as_ref(), entry).await;

        Ok(Audited {
            value: record.profile,
            audit,
        })
    }

    async fn get_record(&self, actor: &Actor, donor_id: UserId) -> CareResult<DonorRecord> {
        rules::donor::read_medical(actor, donor_id).require(actor, "read this donor record")?;
        self.record_or_empty(donor_id).await
    }

    async fn list_contacts(
        &self,
        actor: &Actor,
        donor_id: UserId,
    ) -> CareResult<Vec<EmergencyContact>> {
        rules::donor::read_record(actor, donor_id).require(actor, "read emergency contacts")?;
        Ok(self.record_or_empty(donor_id).await?.contacts)
    }

    async fn list_available_donors(&self, actor: &Actor) -> CareResult<Vec<DonorSummary>> {
        rules::donor::list_summaries(actor).require(actor, "list donors")?;

        let mut summaries: Vec<DonorSummary> = self
            .donors
            .consenting()
            .await?
            .into_iter()
            .filter_map(|record| {
                let donor_type = record.profile.donor_type?;
                Some(DonorSummary {
                    donor_id: record.profile.donor_id,
                    donor_type,
                    organs: record.organs.iter().map(|o| (o.organ, o.status)).collect(),
                    consent_date: record.profile.consent_date,
                })
            })
            .collect();
        summaries.sort_by_key(|s| (s.consent_date, s.donor_id.0));
        Ok(summaries)
    }

    #[instrument(skip(self, actor), fields(donor_id = %donor_id))]
    async fn reserve_organ(
        &self,
        actor: &Actor,
        donor_id: UserId,
        organ: Organ,
    ) -> CareResult<DonorOrgan> {
        self.allocate(actor, donor_id, organ, allocation::reserve).await
    }

    #[instrument(skip(self, actor), fields(donor_id = %donor_id))]
    async fn release_organ(
        &self,
        actor: &Actor,
        donor_id: UserId,
        organ: Organ,
    ) -> CareResult<DonorOrgan> {
        self.allocate(actor, donor_id, organ, allocation::release).await
    }

    #[instrument(skip(self, actor), fields(donor_id = %donor_id))]
    async fn mark_donated(
        &self,
        actor: &Actor,
        donor_id: UserId,
        organ: Organ,
    ) -> CareResult<DonorOrgan> {
        self.allocate(actor, donor_id, organ, allocation::donate).await
    }
}
