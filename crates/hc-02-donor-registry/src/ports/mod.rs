//! Ports layer for the Donor Registry subsystem.
//!
//! - Inbound (Driving) ports: API exposed to the runtime facade
//! - Outbound (Driven) ports: donor record store

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
