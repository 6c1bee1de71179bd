//! Ports layer for the Identity subsystem.
//!
//! - Inbound (Driving) ports: API exposed to the runtime facade
//! - Outbound (Driven) ports: user store and credential store

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
