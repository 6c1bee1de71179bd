//! Organ allocation transitions.
//!
//! ```text
//! [AVAILABLE] ──reserve──→ [MATCHED] ──donate──→ [DONATED]
//!      ↑                       │
//!      └────────release────────┘
//! ```
//!
//! Reserving needs current consent. `Donated` is terminal.

use shared_types::{CareError, CareResult, Organ};

use super::entities::{DonorOrgan, DonorRecord, OrganStatus};

/// Whether a transition changed the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    Changed,
    Unchanged,
}

fn offered(record: &mut DonorRecord, organ: Organ) -> CareResult<&mut DonorOrgan> {
    record
        .organs
        .iter_mut()
        .find(|row| row.organ == organ)
        .ok_or_else(|| CareError::field("donor_id", format!("donor does not offer {}", organ)))
}

/// Marks `organ` as matched to a case.
///
/// # Errors
/// - `Validation` on `donor_id`: no consent, organ not offered, or not available
pub fn reserve(record: &mut DonorRecord, organ: Organ) -> CareResult<Allocation> {
    if !record.profile.consent_given {
        return Err(CareError::field(
            "donor_id",
            "donor has not consented to donate",
        ));
    }
    let row = offered(record, organ)?;
    if row.status != OrganStatus::Available {
        return Err(CareError::field(
            "donor_id",
            format!("{} is no longer available", organ),
        ));
    }
    row.status = OrganStatus::Matched;
    Ok(Allocation::Changed)
}

/// Returns a matched organ to the available pool.
pub fn release(record: &mut DonorRecord, organ: Organ) -> CareResult<Allocation> {
    let row = offered(record, organ)?;
    match row.status {
        OrganStatus::Matched => {
            row.status = OrganStatus::Available;
            Ok(Allocation::Changed)
        }
        OrganStatus::Available => Ok(Allocation::Unchanged),
        OrganStatus::Donated | OrganStatus::Unavailable => Err(CareError::conflict(format!(
            "{} can no longer be released",
            organ
        ))),
    }
}

/// Records that a matched organ was transplanted.
pub fn donate(record: &mut DonorRecord, organ: Organ) -> CareResult<Allocation> {
    let row = offered(record, organ)?;
    match row.status {
        OrganStatus::Matched => {
            row.status = OrganStatus::Donated;
            Ok(Allocation::Changed)
        }
        OrganStatus::Donated => Ok(Allocation::Unchanged),
        OrganStatus::Available | OrganStatus::Unavailable => Err(CareError::conflict(format!(
            "{} was never matched",
            organ
        ))),
    }
}
