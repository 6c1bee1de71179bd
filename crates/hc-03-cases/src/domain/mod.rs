//! # Domain Layer - Cases
//!
//! - `entities`: Case, payloads, file references and the redacted view
//! - `status`: CaseStatus and the transition validator
//! - `config`: CaseConfig

pub mod config;
pub mod entities;
pub mod status;

pub use config::CaseConfig;
pub use entities::*;
pub use status::*;
