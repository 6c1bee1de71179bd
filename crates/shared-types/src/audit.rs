//! # Audit Records
//!
//! Every state-changing operation appends one [`AuditEntry`] as a side
//! effect. Writes are best-effort: a failed append is logged and reported
//! through [`AuditOutcome`], never as an error of the originating operation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::entities::{Actor, Amount, AuditEntryId, CaseId, Role, Timestamp, UserId};
use crate::errors::CareResult;

/// Tag describing what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    UserSignedUp,
    UserApproved,
    ProfileUpdated,
    CaseCreated,
    CaseUpdated,
    CaseFileAttached,
    CaseHospitalAssigned,
    CaseMatched,
    CaseStatusChanged,
    FundingContributed,
    DonorRegistered,
    ConsentGiven,
    ConsentWithdrawn,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::UserSignedUp => "user_signed_up",
            AuditAction::UserApproved => "user_approved",
            AuditAction::ProfileUpdated => "profile_updated",
            AuditAction::CaseCreated => "case_created",
            AuditAction::CaseUpdated => "case_updated",
            AuditAction::CaseFileAttached => "case_file_attached",
            AuditAction::CaseHospitalAssigned => "case_hospital_assigned",
            AuditAction::CaseMatched => "case_matched",
            AuditAction::CaseStatusChanged => "case_status_changed",
            AuditAction::FundingContributed => "funding_contributed",
            AuditAction::DonorRegistered => "donor_registered",
            AuditAction::ConsentGiven => "consent_given",
            AuditAction::ConsentWithdrawn => "consent_withdrawn",
        }
    }
}

/// One append-only audit row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub user_id: UserId,
    pub action: AuditAction,
    pub role: Role,
    pub case_id: Option<CaseId>,
    pub target_user_id: Option<UserId>,
    pub amount: Option<Amount>,
    pub donor_type: Option<String>,
    pub metadata: Map<String, Value>,
    pub created_at: Timestamp,
}

impl AuditEntry {
    pub fn new(actor: &Actor, action: AuditAction, created_at: Timestamp) -> Self {
        Self {
            id: AuditEntryId::new(),
            user_id: actor.user_id,
            action,
            role: actor.role,
            case_id: None,
            target_user_id: None,
            amount: None,
            donor_type: None,
            metadata: Map::new(),
            created_at,
        }
    }

    pub fn with_case(mut self, case_id: CaseId) -> Self {
        self.case_id = Some(case_id);
        self
    }

    pub fn with_target(mut self, user_id: UserId) -> Self {
        self.target_user_id = Some(user_id);
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_donor_type(mut self, donor_type: impl Into<String>) -> Self {
        self.donor_type = Some(donor_type.into());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Append-only sink for audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> CareResult<()>;
}

/// Result of the audit side effect of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    Recorded,
    /// The operation changed nothing, so nothing was written.
    Skipped,
    Failed { reason: String },
}

impl AuditOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, AuditOutcome::Recorded)
    }
}

/// Value returned by a state-changing operation together with the outcome
/// of its audit write.
#[derive(Debug, Clone, PartialEq)]
pub struct Audited<T> {
    pub value: T,
    pub audit: AuditOutcome,
}

impl<T> Audited<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Appends `entry`, swallowing and logging any failure.
pub async fn record_best_effort<S>(sink: &S, entry: AuditEntry) -> AuditOutcome
where
    S: AuditSink + ?Sized,
{
    let action = entry.action;
    match sink.append(entry).await {
        Ok(()) => AuditOutcome::Recorded,
        Err(err) => {
            care_telemetry::AUDIT_FAILURES.inc();
            warn!(action = action.as_str(), error = %err, "Audit write failed; continuing");
            AuditOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}
