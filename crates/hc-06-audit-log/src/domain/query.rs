//! Audit log query filters.

use serde::{Deserialize, Serialize};
use shared_types::{AuditAction, AuditEntry, CaseId, Timestamp, UserId};

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 1_000;

/// Filters for an admin audit query. Empty filters match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    pub action: Option<AuditAction>,
    pub case_id: Option<CaseId>,
    /// Matches the acting user or the target user.
    pub user_id: Option<UserId>,
    pub since: Option<Timestamp>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn action(action: AuditAction) -> Self {
        Self {
            action: Some(action),
            ..Self::default()
        }
    }

    pub fn for_case(case_id: CaseId) -> Self {
        Self {
            case_id: Some(case_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.action.map_or(true, |a| entry.action == a)
            && self.case_id.map_or(true, |c| entry.case_id == Some(c))
            && self.user_id.map_or(true, |u| {
                entry.user_id == u || entry.target_user_id == Some(u)
            })
            && self.since.map_or(true, |t| entry.created_at >= t)
    }

    /// Requested limit clamped to `[1, MAX_LIMIT]`.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}
