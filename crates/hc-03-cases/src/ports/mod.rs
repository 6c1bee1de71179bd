//! Ports layer for the Case subsystem.
//!
//! - Inbound (Driving) ports: API exposed to the runtime facade
//! - Outbound (Driven) ports: case store, file store

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
