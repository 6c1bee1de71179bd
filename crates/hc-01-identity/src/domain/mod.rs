//! # Domain Layer - Identity
//!
//! - `entities`: User, Profile, RoleDetails, SignUp, ProfileUpdate, Credentials

pub mod entities;

pub use entities::*;
