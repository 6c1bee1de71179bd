//! Registration payload and the consent readiness rules.
//!
//! Readiness depends on the donor type:
//!
//! | Requirement | Living | Deceased |
//! |-------------|--------|----------|
//! | blood type | required | required |
//! | age in [18, 100] | required | checked when given |
//! | gender | required | optional |
//! | medical history | required | optional |
//! | organs | living-eligible only | any |
//! | primary contact (name, phone, relationship) | optional | required |

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shared_types::{parse_required, BloodType, CareResult, ContactId, FieldErrors, Organ, Timestamp, UserId};

use super::entities::{
    Advisory, DonorMedicalInfo, DonorOrgan, DonorRecord, DonorType, EmergencyContact,
};

pub const MIN_DONOR_AGE: u8 = 18;
pub const MAX_DONOR_AGE: u8 = 100;
/// Shorter histories are accepted with an advisory.
pub const MIN_HISTORY_LEN: usize = 10;

const DEFAULT_CONTACT_TYPE: &str = "emergency";

/// Emergency contact as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInput {
    pub contact_type: Option<String>,
    pub full_name: String,
    pub relationship: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_primary: bool,
}

impl ContactInput {
    pub fn primary(full_name: &str, relationship: &str, phone: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            relationship: relationship.to_string(),
            phone: phone.to_string(),
            is_primary: true,
            ..Self::default()
        }
    }
}

/// Donor registration form. Raw strings are parsed during [`build`](Self::build).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DonorRegistration {
    pub donor_type: Option<String>,
    pub blood_type: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub medical_history: Option<String>,
    pub has_recent_tests: bool,
    pub recent_tests_description: Option<String>,
    pub organs: Vec<String>,
    pub contacts: Vec<ContactInput>,
    /// Give consent in the same step.
    pub give_consent: bool,
}

impl DonorRegistration {
    /// Parses and validates the form into the rows it replaces.
    ///
    /// Organ rows and contacts are rebuilt from scratch; the stored profile's
    /// consent fields and each kept organ's status are carried over.
    /// Duplicate organs collapse into one row. Matched or donated organs
    /// cannot be dropped.
    pub fn build(
        &self,
        current: &DonorRecord,
        now: Timestamp,
    ) -> Result<(DonorRecord, Vec<Advisory>), FieldErrors> {
        let donor_id = current.profile.donor_id;
        let mut errors = FieldErrors::new();

        let donor_type: Option<DonorType> =
            parse_required(self.donor_type.as_deref(), "donor_type", &mut errors);
        let blood_type = parse_optional::<BloodType>(self.blood_type.as_deref(), "blood_type", &mut errors);
        let age = match self.age {
            Some(age) if !(i32::from(MIN_DONOR_AGE)..=i32::from(MAX_DONOR_AGE)).contains(&age) => {
                errors.push(
                    "age",
                    format!("must be between {} and {}", MIN_DONOR_AGE, MAX_DONOR_AGE),
                );
                None
            }
            Some(age) => u8::try_from(age).ok(),
            None => None,
        };

        let mut organs = BTreeSet::new();
        for raw in &self.organs {
            match raw.parse::<Organ>() {
                Ok(organ) => {
                    organs.insert(organ);
                }
                Err(err) => errors.push("organs", err.detail()),
            }
        }
        if self.organs.is_empty() {
            errors.push("organs", "select at least one organ");
        }

        let contacts = build_contacts(donor_id, &self.contacts, &mut errors);

        let Some(donor_type) = donor_type else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        for held in current.organs.iter().filter(|o| o.status.is_committed()) {
            if !organs.contains(&held.organ) {
                errors.push(
                    "organs",
                    format!("{} is {} and cannot be removed", held.organ, held.status),
                );
            }
        }

        let living = donor_type == DonorType::Living;
        let mut organ_rows = Vec::with_capacity(organs.len());
        for organ in organs {
            match DonorOrgan::new(donor_id, organ, living) {
                Ok(mut row) => {
                    // Allocation status survives re-registration.
                    if let Some(previous) = current.organs.iter().find(|o| o.organ == organ) {
                        row.status = previous.status;
                    }
                    organ_rows.push(row)
                }
                Err(err) => errors.push("organs", err.detail()),
            }
        }

        let mut profile = current.profile.clone();
        profile.donor_type = Some(donor_type);

        let record = DonorRecord {
            profile,
            medical: Some(DonorMedicalInfo {
                donor_id,
                blood_type,
                age,
                gender: non_blank(&self.gender),
                allergies: non_blank(&self.allergies),
                medical_conditions: non_blank(&self.medical_conditions),
                medical_history: non_blank(&self.medical_history),
                has_recent_tests: self.has_recent_tests,
                recent_tests_description: non_blank(&self.recent_tests_description),
                updated_at: now,
            }),
            organs: organ_rows,
            contacts,
        };

        let readiness = assess(donor_type, &record);
        for (field, message) in readiness.errors.iter() {
            errors.push(field, message);
        }
        if errors.is_empty() {
            Ok((record, readiness.advisories))
        } else {
            Err(errors)
        }
    }
}

/// Outcome of checking a record against the consent rules.
#[derive(Debug, Default)]
pub struct Readiness {
    pub errors: FieldErrors,
    pub advisories: Vec<Advisory>,
}

impl Readiness {
    pub fn into_result(self) -> CareResult<Vec<Advisory>> {
        self.errors.into_result()?;
        Ok(self.advisories)
    }
}

/// Checks whether `record` satisfies the requirements of `donor_type`.
pub fn assess(donor_type: DonorType, record: &DonorRecord) -> Readiness {
    let mut readiness = Readiness::default();
    let errors = &mut readiness.errors;
    let medical = record.medical.as_ref();

    if medical.and_then(|m| m.blood_type).is_none() {
        errors.push("blood_type", "is required");
    }

    match donor_type {
        DonorType::Living => {
            match medical.and_then(|m| m.age) {
                None => errors.push("age", "is required for living donors"),
                Some(age) if !(MIN_DONOR_AGE..=MAX_DONOR_AGE).contains(&age) => errors.push(
                    "age",
                    format!("must be between {} and {}", MIN_DONOR_AGE, MAX_DONOR_AGE),
                ),
                Some(_) => {}
            }
            if medical.and_then(|m| m.gender.as_ref()).is_none() {
                errors.push("gender", "is required for living donors");
            }
            match medical.and_then(|m| m.medical_history.as_deref()) {
                None => errors.push("medical_history", "is required for living donors"),
                Some(history) if history.chars().count() < MIN_HISTORY_LEN => {
                    readiness.advisories.push(Advisory::new(
                        "medical_history",
                        "a more detailed history helps hospitals assess the donation",
                    ));
                }
                Some(_) => {}
            }
            if let Some(organ) = record.organs.iter().find(|o| !o.organ.is_living_eligible()) {
                errors.push(
                    "organs",
                    format!("{} cannot be donated by a living donor", organ.organ),
                );
            }
        }
        DonorType::Deceased => {
            if !record.primary_contact().is_some_and(EmergencyContact::is_complete) {
                errors.push(
                    "emergency_contact",
                    "a primary contact with name, phone and relationship is required",
                );
            }
        }
    }

    if record.organs.is_empty() {
        errors.push("organs", "select at least one organ");
    }
    readiness
}

fn build_contacts(
    donor_id: UserId,
    inputs: &[ContactInput],
    errors: &mut FieldErrors,
) -> Vec<EmergencyContact> {
    if inputs.iter().filter(|c| c.is_primary).count() > 1 {
        errors.push("emergency_contact", "only one contact can be primary");
    }
    inputs
        .iter()
        .map(|input| {
            let contact = EmergencyContact {
                id: ContactId::new(),
                donor_id,
                contact_type: non_blank(&input.contact_type)
                    .unwrap_or_else(|| DEFAULT_CONTACT_TYPE.to_string()),
                full_name: input.full_name.trim().to_string(),
                relationship: input.relationship.trim().to_string(),
                phone: input.phone.trim().to_string(),
                email: non_blank(&input.email),
                address: non_blank(&input.address),
                is_primary: input.is_primary,
            };
            if !contact.is_complete() {
                errors.push(
                    "emergency_contact",
                    "every contact needs a name, phone and relationship",
                );
            }
            contact
        })
        .collect()
}

fn parse_optional<T>(raw: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<T>
where
    T: std::str::FromStr<Err = shared_types::CareError>,
{
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;
    parse_required(Some(raw), field, errors)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
