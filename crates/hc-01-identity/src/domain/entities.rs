//! Identity entities and payloads.

use serde::{Deserialize, Serialize};
use shared_types::{FieldErrors, Role, Timestamp, UserId};

pub const MIN_PASSWORD_LEN: usize = 8;
const MAX_NAME_LEN: usize = 120;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub approved: bool,
    pub created_at: Timestamp,
}

/// Role-specific profile attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleDetails {
    Patient {
        date_of_birth: Option<String>,
        gender: Option<String>,
    },
    Donor,
    Hospital {
        hospital_name: String,
        license_number: Option<String>,
    },
    Sponsor {
        organization_name: Option<String>,
        sponsor_type: Option<String>,
    },
    Admin,
}

impl RoleDetails {
    pub fn role(&self) -> Role {
        match self {
            RoleDetails::Patient { .. } => Role::Patient,
            RoleDetails::Donor => Role::Donor,
            RoleDetails::Hospital { .. } => Role::Hospital,
            RoleDetails::Sponsor { .. } => Role::Sponsor,
            RoleDetails::Admin => Role::Admin,
        }
    }

    /// Empty details for a role.
    pub fn empty_for(role: Role) -> Self {
        match role {
            Role::Patient => RoleDetails::Patient {
                date_of_birth: None,
                gender: None,
            },
            Role::Donor => RoleDetails::Donor,
            Role::Hospital => RoleDetails::Hospital {
                hospital_name: String::new(),
                license_number: None,
            },
            Role::Sponsor => RoleDetails::Sponsor {
                organization_name: None,
                sponsor_type: None,
            },
            Role::Admin => RoleDetails::Admin,
        }
    }
}

/// Demographic and contact attributes, 1:1 with [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub details: RoleDetails,
    pub updated_at: Timestamp,
}

impl Profile {
    pub fn empty(user_id: UserId, role: Role, now: Timestamp) -> Self {
        Self {
            user_id,
            phone: None,
            address: None,
            city: None,
            country: None,
            details: RoleDetails::empty_for(role),
            updated_at: now,
        }
    }
}

/// Sign-up payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub details: Option<RoleDetails>,
    pub phone: Option<String>,
}

impl SignUp {
    pub fn new(email: &str, password: &str, name: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role,
            details: None,
            phone: None,
        }
    }

    pub fn with_details(mut self, details: RoleDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Field-level validation. Admins are provisioned, never signed up.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        validate_email(&self.email, &mut errors);
        validate_name(&self.name, &mut errors);
        if self.password.len() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        if self.role == Role::Admin {
            errors.push("role", "admin accounts cannot be self-registered");
        }
        if let Some(details) = &self.details {
            validate_details(details, self.role, &mut errors);
        }
        errors
    }
}

/// Self-service profile edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub details: Option<RoleDetails>,
}

impl ProfileUpdate {
    pub fn validate(&self, role: Role) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            validate_name(name, &mut errors);
        }
        if let Some(details) = &self.details {
            validate_details(details, role, &mut errors);
        }
        errors
    }

    pub fn apply(self, user: &mut User, profile: &mut Profile, now: Timestamp) {
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if self.phone.is_some() {
            profile.phone = self.phone;
        }
        if self.address.is_some() {
            profile.address = self.address;
        }
        if self.city.is_some() {
            profile.city = self.city;
        }
        if self.country.is_some() {
            profile.country = self.country;
        }
        if let Some(details) = self.details {
            profile.details = details;
        }
        profile.updated_at = now;
    }
}

/// Email/password pair presented to [`authenticate`](crate::ports::IdentityApi::authenticate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// Lower-cased, trimmed email used as the lookup key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn validate_email(email: &str, errors: &mut FieldErrors) {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid {
        errors.push("email", "must be a valid email address");
    }
}

fn validate_name(name: &str, errors: &mut FieldErrors) {
    let len = name.trim().chars().count();
    if len == 0 {
        errors.push("name", "is required");
    } else if len > MAX_NAME_LEN {
        errors.push("name", format!("must be at most {} characters", MAX_NAME_LEN));
    }
}

fn validate_details(details: &RoleDetails, role: Role, errors: &mut FieldErrors) {
    if details.role() != role {
        errors.push("details", format!("profile details do not match role {}", role));
        return;
    }
    if let RoleDetails::Hospital { hospital_name, .. } = details {
        if hospital_name.trim().is_empty() {
            errors.push("hospital_name", "is required");
        }
    }
}
