//! # CareBridge Runtime Library
//!
//! Wires every subsystem into a [`ServiceContainer`] and exposes the
//! [`CareApi`] facade. The `carebridge` binary in `main.rs` is a thin
//! shell around this library.
//!
//! ## Architectural Patterns
//!
//! - **DDD (Domain-Driven Design)**: Each subsystem owns its domain logic
//! - **Hexagonal Architecture**: Ports define contracts, Adapters implement them
//! - **Single audit sink**: every state change lands in the Audit Log
//!
//! ## Module Structure
//!
//! ```text
//! container/ - RuntimeConfig (env overrides, validation), ServiceContainer
//! api        - CareApi facade
//! ```

#![allow(clippy::type_complexity)]

pub mod api;
pub mod container;

pub use api::CareApi;
pub use container::{ConfigError, RuntimeConfig, ServiceContainer};
