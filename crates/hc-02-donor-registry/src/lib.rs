//! # Donor Registry
//!
//! **Subsystem ID:** 2
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Records a donor's medical information, the organs they offer, their
//! emergency contacts and their consent to donate. Hospitals discover
//! consenting donors through [`DonorSummary`] rows, which never carry
//! medical information.
//!
//! ## Consent Lifecycle
//!
//! ```text
//! create_profile ──→ [NO CONSENT] ──register/give_consent──→ [CONSENTED]
//!                          ↑                                      │
//!                          └───────────withdraw_consent───────────┘
//! ```
//!
//! Withdrawal clears the consent date but keeps medical info and organ
//! rows. It fails with `Conflict` once `can_withdraw` is cleared.
//!
//! ## Living Donation
//!
//! A living donor may only offer organs in
//! [`Organ::LIVING_ELIGIBLE`](shared_types::Organ::LIVING_ELIGIBLE). The rule
//! is checked when the form is parsed and again by the store.
//!
//! ## Organ Allocation
//!
//! ```text
//! [AVAILABLE] ──reserve_organ──→ [MATCHED] ──mark_donated──→ [DONATED]
//!      ↑                              │
//!      └─────────release_organ────────┘
//! ```
//!
//! Every write runs through [`DonorRepository::update`] under the record
//! lock, so consent and organ status never lose a concurrent change.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/ - InMemoryDonorRepository
//! ports/    - DonorRegistryApi (inbound), DonorRepository (outbound)
//! domain/   - entities, registration form, consent and allocation transitions
//! service   - DonorRegistryService
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::{DonorMutation, DonorRegistryApi, DonorRepository, Registered};
pub use service::DonorRegistryService;
