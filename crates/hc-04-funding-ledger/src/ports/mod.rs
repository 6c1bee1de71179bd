//! Ports layer for the Funding Ledger.
//!
//! - Inbound (Driving) ports: API exposed to the runtime facade
//! - Outbound (Driven) ports: atomic contribution store

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
