//! # Domain Layer - Audit Log
//!
//! - `query`: AuditQuery filters

pub mod query;

pub use query::*;
