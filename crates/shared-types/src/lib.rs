//! # Shared Types Crate
//!
//! Identifiers, value types, the error taxonomy and the cross-subsystem
//! ports (audit sink, user directory, time source) used by every CareBridge
//! subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: types crossing a subsystem boundary live here.
//! - **Actor-Carried Identity**: operations take an authenticated [`Actor`];
//!   payloads never carry their own caller id.
//! - **Best-Effort Audit**: [`record_best_effort`] never fails an operation.

pub mod audit;
pub mod directory;
pub mod entities;
pub mod errors;
pub mod time;

pub use audit::*;
pub use directory::*;
pub use entities::*;
pub use errors::*;
pub use time::*;
