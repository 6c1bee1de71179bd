//! # Domain Layer - Donor Registry
//!
//! - `entities`: DonorProfile, DonorMedicalInfo, DonorOrgan, EmergencyContact
//! - `registration`: registration form and consent readiness rules
//! - `consent`: give / withdraw transitions
//! - `allocation`: organ reserve / release / donate transitions

pub mod allocation;
pub mod consent;
pub mod entities;
pub mod registration;

pub use allocation::Allocation;
pub use consent::ConsentChange;
pub use entities::*;
pub use registration::*;
