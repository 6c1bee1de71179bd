//! Authorization decisions.

use serde::{Deserialize, Serialize};
use shared_types::{Actor, CareError, CareResult};
use tracing::debug;

/// Fields to hide from the viewer at read time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redaction {
    /// Replace the patient's identity with "Anonymous".
    pub patient_identity: bool,
    /// Drop the matched donor's identity.
    pub donor_identity: bool,
}

impl Redaction {
    pub const NONE: Redaction = Redaction {
        patient_identity: false,
        donor_identity: false,
    };

    pub fn is_none(&self) -> bool {
        !self.patient_identity && !self.donor_identity
    }
}

/// Why an operation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The role never has this permission.
    RoleNotPermitted,
    /// The role needs admin approval first.
    NotApproved,
    /// The row belongs to someone else.
    NotOwner,
    /// The case is assigned to a different hospital.
    AssignedElsewhere,
}

impl DenyReason {
    pub fn describe(self) -> &'static str {
        match self {
            DenyReason::RoleNotPermitted => "role is not permitted to perform this operation",
            DenyReason::NotApproved => "account is awaiting admin approval",
            DenyReason::NotOwner => "row belongs to another user",
            DenyReason::AssignedElsewhere => "case is assigned to another hospital",
        }
    }
}

/// Outcome of a policy predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allow { redaction: Redaction },
    Deny(DenyReason),
}

impl Decision {
    pub const ALLOW: Decision = Decision::Allow {
        redaction: Redaction::NONE,
    };

    pub fn allow_redacted(redaction: Redaction) -> Self {
        Decision::Allow { redaction }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    /// Redaction plan when allowed.
    pub fn redaction(&self) -> Option<Redaction> {
        match self {
            Decision::Allow { redaction } => Some(*redaction),
            Decision::Deny(_) => None,
        }
    }

    /// Converts a denial into `CareError::Forbidden` naming `operation`.
    pub fn require(self, actor: &Actor, operation: &str) -> CareResult<Redaction> {
        match self {
            Decision::Allow { redaction } => Ok(redaction),
            Decision::Deny(reason) => {
                care_telemetry::ACCESS_DENIED
                    .with_label_values(&[actor.role.as_str()])
                    .inc();
                debug!(
                    user_id = %actor.user_id,
                    role = actor.role.as_str(),
                    operation,
                    reason = ?reason,
                    "Access denied"
                );
                Err(CareError::forbidden(format!(
                    "{} may not {}: {}",
                    actor.role,
                    operation,
                    reason.describe()
                )))
            }
        }
    }
}
