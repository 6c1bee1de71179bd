//! Consent state transitions.
//!
//! ```text
//! [NO CONSENT] ──give(type)──→ [CONSENTED(type, date)]
//!      ↑                              │
//!      └────────withdraw()────────────┘   (only while can_withdraw)
//! ```

use shared_types::{CareError, CareResult, Timestamp};

use super::entities::{DonorProfile, DonorType};

/// What a transition did to the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentChange {
    Given,
    Withdrawn,
    Unchanged,
}

impl ConsentChange {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsentChange::Given => "given",
            ConsentChange::Withdrawn => "withdrawn",
            ConsentChange::Unchanged => "unchanged",
        }
    }
}

/// Records consent for `donor_type`. Readiness must be checked beforehand.
pub fn give(profile: &mut DonorProfile, donor_type: DonorType, now: Timestamp) -> ConsentChange {
    if profile.consent_given && profile.donor_type == Some(donor_type) {
        return ConsentChange::Unchanged;
    }
    profile.donor_type = Some(donor_type);
    profile.consent_given = true;
    profile.consent_date = Some(now);
    ConsentChange::Given
}

/// Clears consent. Medical info and organ rows are left in place.
pub fn withdraw(profile: &mut DonorProfile) -> CareResult<ConsentChange> {
    if !profile.can_withdraw {
        return Err(CareError::conflict("consent can no longer be withdrawn"));
    }
    if !profile.consent_given {
        return Ok(ConsentChange::Unchanged);
    }
    profile.consent_given = false;
    profile.consent_date = None;
    Ok(ConsentChange::Withdrawn)
}
