//! # Core Domain Entities
//!
//! Identifiers and value types shared by every CareBridge subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `UserId`, `Role`, `Actor`
//! - **Clinical**: `BloodType`, `Organ`
//! - **Ledger**: `CaseId`, `Amount`, `Timestamp`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{CareError, FieldErrors};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Monetary amount in whole currency units.
///
/// Signed so that callers can submit a non-positive amount and receive a
/// validation error instead of a parse failure.
pub type Amount = i64;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(
    /// Identity of a registered user (the root entity of every profile).
    UserId
);
uuid_id!(
    /// Identity of a transplant case.
    CaseId
);
uuid_id!(
    /// Identity of a donor emergency contact row.
    ContactId
);
uuid_id!(
    /// Identity of a funding contribution.
    ContributionId
);
uuid_id!(
    /// Identity of an audit log entry.
    AuditEntryId
);

// =============================================================================
// ROLES & ACTORS
// =============================================================================

/// Role assigned at sign-up. Immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Donor,
    Hospital,
    Sponsor,
    Admin,
}

impl Role {
    /// Patients and donors are approved at sign-up; hospitals and sponsors
    /// wait for an admin. Admin accounts are provisioned, never self-registered.
    pub fn auto_approved(self) -> bool {
        matches!(self, Role::Patient | Role::Donor | Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Donor => "donor",
            Role::Hospital => "hospital",
            Role::Sponsor => "sponsor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "donor" => Ok(Role::Donor),
            "hospital" => Ok(Role::Hospital),
            "sponsor" => Ok(Role::Sponsor),
            "admin" => Ok(Role::Admin),
            other => Err(CareError::field("role", format!("unknown role '{}'", other))),
        }
    }
}

/// The authenticated caller of an operation.
///
/// Produced by the identity collaborator for every request. The approval
/// flag is captured at authentication time and is what the access policy
/// evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
    pub approved: bool,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role, approved: bool) -> Self {
        Self {
            user_id,
            role,
            approved,
        }
    }

    pub fn patient(user_id: UserId) -> Self {
        Self::new(user_id, Role::Patient, true)
    }

    pub fn donor(user_id: UserId) -> Self {
        Self::new(user_id, Role::Donor, true)
    }

    pub fn hospital(user_id: UserId, approved: bool) -> Self {
        Self::new(user_id, Role::Hospital, approved)
    }

    pub fn sponsor(user_id: UserId, approved: bool) -> Self {
        Self::new(user_id, Role::Sponsor, approved)
    }

    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Admin, true)
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}

// =============================================================================
// CLINICAL VALUE TYPES
// =============================================================================

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    AbNeg,
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "O-")]
    ONeg,
}

impl BloodType {
    pub fn as_str(self) -> &'static str {
        match self {
            BloodType::APos => "A+",
            BloodType::ANeg => "A-",
            BloodType::BPos => "B+",
            BloodType::BNeg => "B-",
            BloodType::AbPos => "AB+",
            BloodType::AbNeg => "AB-",
            BloodType::OPos => "O+",
            BloodType::ONeg => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A+" => Ok(BloodType::APos),
            "A-" => Ok(BloodType::ANeg),
            "B+" => Ok(BloodType::BPos),
            "B-" => Ok(BloodType::BNeg),
            "AB+" => Ok(BloodType::AbPos),
            "AB-" => Ok(BloodType::AbNeg),
            "O+" => Ok(BloodType::OPos),
            "O-" => Ok(BloodType::ONeg),
            other => Err(CareError::field(
                "blood_type",
                format!("unknown blood type '{}'", other),
            )),
        }
    }
}

/// Organ or tissue that can be offered by a donor or needed by a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Organ {
    Kidney,
    Liver,
    PartialLiver,
    Heart,
    Lung,
    Pancreas,
    Intestine,
    Cornea,
    BoneMarrow,
    Blood,
    Skin,
}

impl Organ {
    /// Organs a living donor may offer.
    pub const LIVING_ELIGIBLE: [Organ; 4] = [
        Organ::Kidney,
        Organ::PartialLiver,
        Organ::BoneMarrow,
        Organ::Blood,
    ];

    pub fn is_living_eligible(self) -> bool {
        Self::LIVING_ELIGIBLE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Organ::Kidney => "kidney",
            Organ::Liver => "liver",
            Organ::PartialLiver => "partial_liver",
            Organ::Heart => "heart",
            Organ::Lung => "lung",
            Organ::Pancreas => "pancreas",
            Organ::Intestine => "intestine",
            Organ::Cornea => "cornea",
            Organ::BoneMarrow => "bone_marrow",
            Organ::Blood => "blood",
            Organ::Skin => "skin",
        }
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Organ {
    type Err = CareError;

    /// Accepts `partial_liver`, `partial-liver` and `Partial Liver` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "kidney" => Ok(Organ::Kidney),
            "liver" => Ok(Organ::Liver),
            "partial_liver" => Ok(Organ::PartialLiver),
            "heart" => Ok(Organ::Heart),
            "lung" | "lungs" => Ok(Organ::Lung),
            "pancreas" => Ok(Organ::Pancreas),
            "intestine" | "intestines" => Ok(Organ::Intestine),
            "cornea" | "corneas" => Ok(Organ::Cornea),
            "bone_marrow" => Ok(Organ::BoneMarrow),
            "blood" => Ok(Organ::Blood),
            "skin" => Ok(Organ::Skin),
            _ => Err(CareError::field("organ", format!("unknown organ '{}'", s.trim()))),
        }
    }
}

/// Parses an optional raw field, recording a missing or malformed value
/// under `field` in `errors`.
pub fn parse_required<T>(raw: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<T>
where
    T: FromStr<Err = CareError>,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => {
            errors.push(field, "is required");
            None
        }
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                errors.push(field, err.detail());
                None
            }
        },
    }
}
