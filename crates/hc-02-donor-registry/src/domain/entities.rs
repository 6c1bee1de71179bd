//! Donor registry entities.

use serde::{Deserialize, Serialize};
use shared_types::{BloodType, CareError, CareResult, ContactId, Organ, Timestamp, UserId};
use std::fmt;
use std::str::FromStr;

/// Whether the donor offers organs while alive or after death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonorType {
    Living,
    Deceased,
}

impl DonorType {
    pub fn as_str(self) -> &'static str {
        match self {
            DonorType::Living => "living",
            DonorType::Deceased => "deceased",
        }
    }
}

impl fmt::Display for DonorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonorType {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "living" => Ok(DonorType::Living),
            "deceased" => Ok(DonorType::Deceased),
            other => Err(CareError::field(
                "donor_type",
                format!("unknown donor type '{}'", other),
            )),
        }
    }
}

/// Consent row, 1:1 with a donor user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorProfile {
    pub donor_id: UserId,
    pub donor_type: Option<DonorType>,
    pub consent_given: bool,
    pub consent_date: Option<Timestamp>,
    pub can_withdraw: bool,
}

impl DonorProfile {
    /// Fresh profile created alongside the donor's account.
    pub fn new(donor_id: UserId) -> Self {
        Self {
            donor_id,
            donor_type: None,
            consent_given: false,
            consent_date: None,
            can_withdraw: true,
        }
    }
}

/// Medical information, 1:1 with [`DonorProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorMedicalInfo {
    pub donor_id: UserId,
    pub blood_type: Option<BloodType>,
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub medical_history: Option<String>,
    pub has_recent_tests: bool,
    pub recent_tests_description: Option<String>,
    pub updated_at: Timestamp,
}

/// Lifecycle of an offered organ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganStatus {
    Available,
    Matched,
    Donated,
    Unavailable,
}

impl OrganStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrganStatus::Available => "available",
            OrganStatus::Matched => "matched",
            OrganStatus::Donated => "donated",
            OrganStatus::Unavailable => "unavailable",
        }
    }

    /// Tied to a case; the row must stay.
    pub fn is_committed(self) -> bool {
        matches!(self, OrganStatus::Matched | OrganStatus::Donated)
    }
}

impl fmt::Display for OrganStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One organ offered by a donor. Unique per (donor_id, organ).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorOrgan {
    pub donor_id: UserId,
    pub organ: Organ,
    pub is_living_donation: bool,
    pub status: OrganStatus,
}

impl DonorOrgan {
    /// Builds an organ row, rejecting living donation of a non-eligible organ.
    pub fn new(donor_id: UserId, organ: Organ, is_living_donation: bool) -> CareResult<Self> {
        if is_living_donation && !organ.is_living_eligible() {
            return Err(CareError::field(
                "organs",
                format!("{} cannot be donated by a living donor", organ),
            ));
        }
        Ok(Self {
            donor_id,
            organ,
            is_living_donation,
            status: OrganStatus::Available,
        })
    }
}

/// A person to contact on the donor's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: ContactId,
    pub donor_id: UserId,
    pub contact_type: String,
    pub full_name: String,
    pub relationship: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_primary: bool,
}

impl EmergencyContact {
    /// Name, phone and relationship are all filled in.
    pub fn is_complete(&self) -> bool {
        !self.full_name.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.relationship.trim().is_empty()
    }
}

/// Everything stored for one donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorRecord {
    pub profile: DonorProfile,
    pub medical: Option<DonorMedicalInfo>,
    pub organs: Vec<DonorOrgan>,
    pub contacts: Vec<EmergencyContact>,
}

impl DonorRecord {
    pub fn empty(donor_id: UserId) -> Self {
        Self {
            profile: DonorProfile::new(donor_id),
            medical: None,
            organs: Vec::new(),
            contacts: Vec::new(),
        }
    }

    pub fn primary_contact(&self) -> Option<&EmergencyContact> {
        self.contacts.iter().find(|c| c.is_primary)
    }

    /// Re-derives each organ row's living-donation flag from the donor type.
    pub fn align_organs(&mut self) {
        let living = self.profile.donor_type == Some(DonorType::Living);
        for row in &mut self.organs {
            row.is_living_donation = living;
        }
    }
}

/// Hospital-facing view of a consenting donor. Carries no medical info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorSummary {
    pub donor_id: UserId,
    pub donor_type: DonorType,
    pub organs: Vec<(Organ, OrganStatus)>,
    pub consent_date: Option<Timestamp>,
}

/// Non-blocking observation returned with a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub field: String,
    pub message: String,
}

impl Advisory {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
