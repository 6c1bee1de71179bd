//! # Service Container
//!
//! Central container holding all subsystem services with their adapters
//! wired in.
//!
//! - Services initialized in dependency order (Level 0 → Level 3)
//! - One audit sink and one time source shared by every service
//! - Cases and the Funding Ledger share one case store

pub mod config;
pub mod services;

pub use config::{BootstrapConfig, ConfigError, RuntimeConfig, StorageConfig};
pub use services::ServiceContainer;
