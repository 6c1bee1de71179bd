//! # Identity & Role Store
//!
//! **Subsystem ID:** 1
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Holds user identity, the immutable role and the approval flag, plus the
//! 1:1 per-role profile. Every other subsystem depends on it through the
//! [`Actor`](shared_types::Actor) it produces and the
//! [`UserDirectory`](shared_types::UserDirectory) port it implements.
//!
//! ## Approval Lifecycle
//!
//! ```text
//! sign_up(patient|donor) ──→ [APPROVED]
//! sign_up(hospital|sponsor) ──→ [PENDING] ──approve_user(admin)──→ [APPROVED]
//!                                                 │
//!                                                 └── repeat: idempotent success
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/ - InMemoryUserRepository, InMemoryCredentialStore
//! ports/    - IdentityApi (inbound), UserRepository + CredentialStore (outbound)
//! domain/   - User, Profile, RoleDetails, sign-up/profile payloads
//! service   - IdentityService
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::IdentityService;
