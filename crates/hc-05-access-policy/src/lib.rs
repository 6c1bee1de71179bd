//! # Access Policy Subsystem
//!
//! **Subsystem ID:** 5
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Explicit replacement for declarative row-level security. Every
//! (entity, operation) pair has a predicate that takes the authenticated
//! [`Actor`](shared_types::Actor) and the ownership facts of the target row
//! and returns a [`Decision`]. Predicates are pure and evaluated by the
//! service layer before any write is issued.
//!
//! ## Rule Matrix
//!
//! | Role | Cases | Donor rows | Funding | Audit |
//! |------|-------|------------|---------|-------|
//! | Patient | own only, read/write | - | read own case ledger | - |
//! | Donor | read all, patient redacted | own rows | - | - |
//! | Hospital* | unassigned or own, read/write | summaries only | read | - |
//! | Sponsor* | read all, donor redacted | - | contribute, own history | - |
//! | Admin | read all, status/assignment | read | read | query |
//!
//! `*` gated on the approval flag.
//!
//! ## Redaction
//!
//! ```text
//! viewer ─→ Decision::Allow { redaction } ─→ CaseView::redact(redaction)
//!                                               │
//!                                               ├── patient_identity → "Anonymous"
//!                                               └── donor_identity   → None
//! ```

pub mod domain;

pub use domain::*;
