//! # Audit Log
//!
//! **Subsystem ID:** 6
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Append-only record of state-changing actions. Every service writes to
//! it through the shared [`AuditSink`](shared_types::AuditSink) port via
//! [`record_best_effort`](shared_types::record_best_effort), so a failed
//! append is logged and counted but never fails the originating operation.
//!
//! Only admins can read the log. There is no mutation or deletion API.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/ - InMemoryAuditRepository
//! ports/    - AuditLogApi (inbound), AuditRepository (outbound)
//! domain/   - AuditQuery
//! service   - AuditLogService (also the AuditSink)
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::AuditLogService;
