//! # Domain Layer - Access Policy
//!
//! - `decision`: `Decision`, `Redaction`, conversion into `CareError::Forbidden`
//! - `scope`: ownership facts of the rows being checked
//! - `rules`: one predicate per (entity, operation)

pub mod decision;
pub mod rules;
pub mod scope;

pub use decision::*;
pub use scope::*;
