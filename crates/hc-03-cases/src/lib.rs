//! # Case Subsystem
//!
//! **Subsystem ID:** 3
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Patient-initiated transplant cases: organ, urgency, clinical details,
//! attached files and the funding aggregate, moved through an ordered
//! status lifecycle by hospitals and admins.
//!
//! ## Status Lifecycle
//!
//! | From | To | Trigger |
//! |------|----|---------|
//! | waiting | matched | `match_donor` (hospital/admin) |
//! | waiting, matched | funded | funding goal reached, or `set_status` |
//! | matched, funded | transplanted | `set_status` (hospital/admin), terminal |
//!
//! There are no backward moves and no cancellation state. Requesting the
//! current status again is a no-op success.
//!
//! ## Atomic Updates
//!
//! Every write goes through [`CaseRepository::update`](ports::CaseRepository::update),
//! which runs the access check, the transition check and the mutation
//! under one row lock. A denied or illegal write leaves the row untouched.
//!
//! ## Reads
//!
//! [`CaseView`] applies the redaction plan from the access policy: donors
//! see "Anonymous" in place of the patient, and only the matched donor
//! sees their own id on the case.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/ - InMemoryCaseRepository, InMemoryFileStore
//! ports/    - CaseApi (inbound), CaseRepository + FileStore (outbound)
//! domain/   - Case, CaseStatus, payloads, CaseView, CaseConfig
//! service   - CaseService
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::CaseService;
