//! Case Service - case lifecycle, attachments and redacted reads.

use std::sync::Arc;

use async_trait::async_trait;
use hc_05_access_policy::{rules, Redaction};
use shared_types::{
    record_best_effort, Actor, AuditAction, AuditEntry, AuditOutcome, AuditSink, Audited,
    CareError, CareResult, CaseId, Role, TimeSource, UserDirectory, UserId,
};
use tracing::{debug, info, instrument};

use crate::domain::{
    check_transition, Case, CaseConfig, CaseFilter, CaseStatus, CaseUpdate, CaseView, FileRef,
    FileUpload, FundingProgress, NewCase, Transition,
};
use crate::ports::{CaseApi, CaseRepository, FileStore, MatchRequest};

/// Case service over a case store and a blob store.
pub struct CaseService<R, F>
where
    R: CaseRepository,
    F: FileStore,
{
    cases: Arc<R>,
    files: Arc<F>,
    directory: Arc<dyn UserDirectory>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn TimeSource>,
    config: CaseConfig,
}

impl<R, F> CaseService<R, F>
where
    R: CaseRepository,
    F: FileStore,
{
    pub fn new(
        cases: Arc<R>,
        files: Arc<F>,
        directory: Arc<dyn UserDirectory>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn TimeSource>,
        config: CaseConfig,
    ) -> Self {
        Self {
            cases,
            files,
            directory,
            audit,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &CaseConfig {
        &self.config
    }

    async fn require_case(&self, case_id: CaseId) -> CareResult<Case> {
        self.cases
            .get(case_id)
            .await?
            .ok_or_else(|| CareError::not_found("case", case_id))
    }

    async fn render(&self, case: Case, redaction: Redaction) -> CareResult<CaseView> {
        let name = if redaction.patient_identity {
            None
        } else {
            self.directory.lookup(case.patient_id).await?.map(|u| u.name)
        };
        Ok(CaseView::render(case, name, redaction))
    }

    async fn upload(&self, owner: UserId, case_id: CaseId, upload: FileUpload) -> CareResult<FileRef> {
        let path = upload.storage_path(owner, case_id);
        let blob = self
            .files
            .put(&path, &upload.content_type, upload.bytes)
            .await?;
        debug!(case_id = %case_id, path = %path, size = blob.size, "Stored case file");
        Ok(FileRef {
            url: blob.url,
            path,
            size: blob.size,
            content_type: upload.content_type,
            name: upload.filename.trim().to_string(),
            category: upload.category,
        })
    }

    /// Checks that `user_id` exists with `role` and, for hospitals, is approved.
    async fn require_role(&self, user_id: UserId, role: Role, field: &str) -> CareResult<()> {
        match self.directory.lookup(user_id).await? {
            Some(user) if user.role == role && (role != Role::Hospital || user.approved) => Ok(()),
            Some(_) => Err(CareError::field(
                field,
                format!("user {} is not an eligible {}", user_id, role),
            )),
            None => Err(CareError::field(field, format!("unknown user {}", user_id))),
        }
    }

    fn count_transition(from: CaseStatus, to: CaseStatus) {
        care_telemetry::CASE_TRANSITIONS
            .with_label_values(&[from.as_str(), to.as_str()])
            .inc();
    }
}

fn reject_if_transplanted(case: &Case) -> CareResult<()> {
    if case.status.is_terminal() {
        return Err(CareError::conflict(format!(
            "case {} is transplanted and can no longer change",
            case.id
        )));
    }
    Ok(())
}

#[async_trait]
impl<R, F> CaseApi for CaseService<R, F>
where
    R: CaseRepository,
    F: FileStore,
{
    #[instrument(skip(self, actor, new_case), fields(patient_id = %actor.user_id))]
    async fn create_case(&self, actor: &Actor, new_case: NewCase) -> CareResult<Audited<CaseView>> {
        rules::case::create(actor).require(actor, "create cases")?;

        let valid = new_case
            .validate(self.config.max_file_bytes)
            .map_err(CareError::Validation)?;
        if new_case.files.len() > self.config.max_files_per_case {
            return Err(CareError::field(
                "files",
                format!("at most {} files per case", self.config.max_files_per_case),
            ));
        }

        // Blobs stored here stay behind if the insert below fails.
        let case_id = CaseId::new();
        let mut files = Vec::with_capacity(new_case.files.len());
        for upload in new_case.files {
            files.push(self.upload(actor.user_id, case_id, upload).await?);
        }

        let now = self.clock.now();
        let case = Case {
            id: case_id,
            patient_id: actor.user_id,
            organ_needed: valid.organ_needed,
            urgency_level: valid.urgency_level,
            status: CaseStatus::Waiting,
            assigned_hospital_id: None,
            matched_donor_id: None,
            funding_goal: valid.funding_goal,
            funding_amount: 0,
            medical: valid.medical,
            files,
            created_at: now,
            updated_at: now,
        };
        self.cases.insert(case.clone()).await?;

        care_telemetry::CASES_CREATED.inc();
        info!(
            case_id = %case.id,
            organ = case.organ_needed.as_str(),
            urgency = case.urgency_level.as_str(),
            files = case.files.len(),
            "Case created"
        );

        let audit = record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(actor, AuditAction::CaseCreated, now)
                .with_case(case.id)
                .with_metadata("organ_needed", case.organ_needed.as_str())
                .with_metadata("urgency_level", case.urgency_level.as_str())
                .with_metadata("funding_goal", case.funding_goal),
        )
        .await;

        let value = self.render(case, Redaction::NONE).await?;
        Ok(Audited { value, audit })
    }

    #[instrument(skip(self, actor, update), fields(case_id = %case_id))]
    async fn update_case(
        &self,
        actor: &Actor,
        case_id: CaseId,
        update: CaseUpdate,
    ) -> CareResult<Audited<CaseView>> {
        if update.is_empty() {
            let case = self.require_case(case_id).await?;
            rules::case::update_details(actor, &case.scope()).require(actor, "edit this case")?;
            let value = self.render(case, Redaction::NONE).await?;
            return Ok(Audited {
                value,
                audit: AuditOutcome::Skipped,
            });
        }

        let now = self.clock.now();
        let case = self
            .cases
            .update(
                case_id,
                Box::new(|case: &mut Case| {
                    rules::case::update_details(actor, &case.scope())
                        .require(actor, "edit this case")?;
                    reject_if_transplanted(case)?;
                    update.apply(case, now).map_err(CareError::Validation)
                }),
            )
            .await?;

        info!("Case details updated");
        let audit = record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(actor, AuditAction::CaseUpdated, now).with_case(case_id),
        )
        .await;

        let value = self.render(case, Redaction::NONE).await?;
        Ok(Audited { value, audit })
    }

    #[instrument(skip(self, actor, upload), fields(case_id = %case_id))]
    async fn attach_file(
        &self,
        actor: &Actor,
        case_id: CaseId,
        upload: FileUpload,
    ) -> CareResult<Audited<FileRef>> {
        let case = self.require_case(case_id).await?;
        rules::case::update_details(actor, &case.scope()).require(actor, "attach files")?;
        reject_if_transplanted(&case)?;

        let mut errors = shared_types::FieldErrors::new();
        if upload.filename.trim().is_empty() {
            errors.push("files", "every file needs a name");
        }
        if upload.bytes.len() as u64 > self.config.max_file_bytes {
            errors.push(
                "files",
                format!("file exceeds the {} byte limit", self.config.max_file_bytes),
            );
        }
        if case.files.len() >= self.config.max_files_per_case {
            errors.push(
                "files",
                format!("at most {} files per case", self.config.max_files_per_case),
            );
        }
        errors.into_result()?;

        let file = self.upload(case.patient_id, case_id, upload).await?;
        let max_files = self.config.max_files_per_case;
        let attached = file.clone();
        let now = self.clock.now();
        self.cases
            .update(
                case_id,
                Box::new(move |case: &mut Case| {
                    if case.files.len() >= max_files {
                        return Err(CareError::field(
                            "files",
                            format!("at most {} files per case", max_files),
                        ));
                    }
                    case.files.push(attached);
                    case.updated_at = now;
                    Ok(())
                }),
            )
            .await?;

        info!(name = %file.name, size = file.size, "File attached");
        let audit = record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(actor, AuditAction::CaseFileAttached, now)
                .with_case(case_id)
                .with_metadata("file", file.name.clone())
                .with_metadata("category", file.category.as_str()),
        )
        .await;

        Ok(Audited { value: file, audit })
    }

    #[instrument(skip(self, actor), fields(case_id = %case_id, hospital_id = %hospital_id))]
    async fn assign_hospital(
        &self,
        actor: &Actor,
        case_id: CaseId,
        hospital_id: UserId,
    ) -> CareResult<Audited<CaseView>> {
        if actor.role == Role::Hospital && actor.user_id != hospital_id {
            return Err(CareError::forbidden("hospitals may only assign themselves"));
        }
        self.require_role(hospital_id, Role::Hospital, "hospital_id").await?;

        let now = self.clock.now();
        let mut changed = false;
        let case = self
            .cases
            .update(
                case_id,
                Box::new(|case: &mut Case| {
                    rules::case::manage(actor, &case.scope()).require(actor, "assign this case")?;
                    reject_if_transplanted(case)?;
                    if case.assigned_hospital_id != Some(hospital_id) {
                        case.assigned_hospital_id = Some(hospital_id);
                        case.updated_at = now;
                        changed = true;
                    }
                    Ok(())
                }),
            )
            .await?;

        let audit = if changed {
            info!("Hospital assigned");
            record_best_effort(
                self.audit.as_ref(),
                AuditEntry::new(actor, AuditAction::CaseHospitalAssigned, now)
                    .with_case(case_id)
                    .with_target(hospital_id),
            )
            .await
        } else {
            AuditOutcome::Skipped
        };

        let value = self.render(case, Redaction::NONE).await?;
        Ok(Audited { value, audit })
    }

    #[instrument(skip(self, actor, request), fields(case_id = %case_id))]
    async fn match_donor(
        &self,
        actor: &Actor,
        case_id: CaseId,
        request: MatchRequest,
    ) -> CareResult<Audited<CaseView>> {
        if request.donor_id.is_none() && request.hospital_id.is_none() {
            return Err(CareError::field("donor_id", "a donor or hospital is required"));
        }
        if let Some(hospital_id) = request.hospital_id {
            if actor.role == Role::Hospital && actor.user_id != hospital_id {
                return Err(CareError::forbidden("hospitals may only assign themselves"));
            }
            self.require_role(hospital_id, Role::Hospital, "hospital_id").await?;
        }
        if let Some(donor_id) = request.donor_id {
            self.require_role(donor_id, Role::Donor, "donor_id").await?;
        }

        let now = self.clock.now();
        let mut moved = None;
        let case = self
            .cases
            .update(
                case_id,
                Box::new(|case: &mut Case| {
                    rules::case::manage(actor, &case.scope()).require(actor, "match this case")?;
                    reject_if_transplanted(case)?;
                    if let Some(donor_id) = request.donor_id {
                        case.matched_donor_id = Some(donor_id);
                    }
                    if let Some(hospital_id) = request.hospital_id {
                        case.assigned_hospital_id = Some(hospital_id);
                    } else if actor.role == Role::Hospital && case.assigned_hospital_id.is_none() {
                        // Matching an open case claims it for the hospital.
                        case.assigned_hospital_id = Some(actor.user_id);
                    }
                    // Funded cases keep their status.
                    if case.status == CaseStatus::Waiting {
                        moved = Some((case.status, CaseStatus::Matched));
                        case.status = CaseStatus::Matched;
                    }
                    case.updated_at = now;
                    Ok(())
                }),
            )
            .await?;

        if let Some((from, to)) = moved {
            Self::count_transition(from, to);
        }
        info!(
            status = case.status.as_str(),
            donor_matched = case.matched_donor_id.is_some(),
            "Case matched"
        );

        let mut entry = AuditEntry::new(actor, AuditAction::CaseMatched, now)
            .with_case(case_id)
            .with_metadata("status", case.status.as_str());
        if let Some(donor_id) = request.donor_id {
            entry = entry.with_target(donor_id);
        }
        if let Some(hospital_id) = case.assigned_hospital_id {
            entry = entry.with_metadata("hospital_id", hospital_id.to_string());
        }
        let audit = record_best_effort(self.audit.as_ref(), entry).await;

        let value = self.render(case, Redaction::NONE).await?;
        Ok(Audited { value, audit })
    }

    #[instrument(skip(self, actor), fields(case_id = %case_id, to = %status))]
    async fn set_status(
        &self,
        actor: &Actor,
        case_id: CaseId,
        status: CaseStatus,
    ) -> CareResult<Audited<CaseView>> {
        let now = self.clock.now();
        let config = &self.config;
        let mut transition = Transition::Noop;
        let case = self
            .cases
            .update(
                case_id,
                Box::new(|case: &mut Case| {
                    rules::case::manage(actor, &case.scope())
                        .require(actor, "change this case's status")?;
                    let funding = FundingProgress {
                        goal: case.funding_goal,
                        amount: case.funding_amount,
                    };
                    transition = check_transition(case.status, status, funding, config)?;
                    if let Transition::Apply(_, to) = transition {
                        case.status = to;
                        case.updated_at = now;
                    }
                    Ok(())
                }),
            )
            .await?;

        let audit = match transition {
            Transition::Noop => AuditOutcome::Skipped,
            Transition::Apply(from, to) => {
                Self::count_transition(from, to);
                info!(from = from.as_str(), "Case status changed");
                record_best_effort(
                    self.audit.as_ref(),
                    AuditEntry::new(actor, AuditAction::CaseStatusChanged, now)
                        .with_case(case_id)
                        .with_metadata("from", from.as_str())
                        .with_metadata("to", to.as_str()),
                )
                .await
            }
        };

        let value = self.render(case, Redaction::NONE).await?;
        Ok(Audited { value, audit })
    }

    async fn get_case(&self, actor: &Actor, case_id: CaseId) -> CareResult<CaseView> {
        let case = self.require_case(case_id).await?;
        let redaction = rules::case::read(actor, &case.scope()).require(actor, "read this case")?;
        self.render(case, redaction).await
    }

    async fn list_cases(&self, actor: &Actor, filter: CaseFilter) -> CareResult<Vec<CaseView>> {
        rules::case::list(actor).require(actor, "list cases")?;

        let mut visible: Vec<(Case, Redaction)> = self
            .cases
            .list()
            .await?
            .into_iter()
            .filter(|case| filter.matches(case))
            .filter_map(|case| {
                let redaction = rules::case::read(actor, &case.scope()).redaction()?;
                Some((case, redaction))
            })
            .collect();
        visible.sort_by_key(|(case, _)| (case.urgency_level, case.created_at));

        let mut views = Vec::with_capacity(visible.len());
        for (case, redaction) in visible {
            views.push(self.render(case, redaction).await?);
        }
        Ok(views)
    }
}
