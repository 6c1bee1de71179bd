//! Case status and the central transition validator.
//!
//! ```text
//! [WAITING] ──match──→ [MATCHED] ──→ [FUNDED] ──→ [TRANSPLANTED]
//!     │                    │            ↑               ↑
//!     └────────────────────┼────────────┘               │
//!                          └────────────────────────────┘
//! ```
//!
//! Status never moves backwards and `Transplanted` is terminal.

use serde::{Deserialize, Serialize};
use shared_types::{Amount, CareError, CareResult};
use std::fmt;
use std::str::FromStr;

use super::config::CaseConfig;

/// Lifecycle position of a case, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Waiting,
    Matched,
    Funded,
    Transplanted,
}

impl CaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::Waiting => "waiting",
            CaseStatus::Matched => "matched",
            CaseStatus::Funded => "funded",
            CaseStatus::Transplanted => "transplanted",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == CaseStatus::Transplanted
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waiting" => Ok(CaseStatus::Waiting),
            "matched" => Ok(CaseStatus::Matched),
            "funded" => Ok(CaseStatus::Funded),
            "transplanted" => Ok(CaseStatus::Transplanted),
            other => Err(CareError::field("status", format!("unknown status '{}'", other))),
        }
    }
}

/// Result of validating a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move from the first status to the second.
    Apply(CaseStatus, CaseStatus),
    /// Already in the requested status.
    Noop,
}

/// Funding facts the `funded` precondition looks at.
#[derive(Debug, Clone, Copy)]
pub struct FundingProgress {
    pub goal: Amount,
    pub amount: Amount,
}

impl FundingProgress {
    pub fn goal_reached(&self) -> bool {
        self.goal > 0 && self.amount >= self.goal
    }
}

/// Validates a manual status change by a hospital or admin.
///
/// # Errors
/// - `Conflict`: backward move, leaving `transplanted`, skipping straight
///   from `waiting` to `transplanted`, or `funded` without the goal when
///   the funding precondition is enabled
pub fn check_transition(
    from: CaseStatus,
    to: CaseStatus,
    funding: FundingProgress,
    config: &CaseConfig,
) -> CareResult<Transition> {
    use CaseStatus::*;

    if from == to {
        return Ok(Transition::Noop);
    }
    if from.is_terminal() {
        return Err(CareError::conflict("case is already transplanted"));
    }
    if to < from {
        return Err(CareError::conflict(format!(
            "case cannot move back from {} to {}",
            from, to
        )));
    }
    match (from, to) {
        (Waiting, Matched) | (Matched, Transplanted) | (Funded, Transplanted) => {}
        (Waiting, Funded) | (Matched, Funded) => {
            if config.require_funding_for_funded && !funding.goal_reached() {
                return Err(CareError::conflict(format!(
                    "funding goal not reached ({} of {})",
                    funding.amount, funding.goal
                )));
            }
        }
        (Waiting, Transplanted) => {
            return Err(CareError::conflict(
                "case must be matched or funded before transplant",
            ));
        }
        _ => {
            return Err(CareError::conflict(format!(
                "illegal transition {} -> {}",
                from, to
            )));
        }
    }
    Ok(Transition::Apply(from, to))
}
