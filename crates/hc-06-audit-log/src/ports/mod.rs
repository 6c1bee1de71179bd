//! Ports layer for the Audit Log.
//!
//! - Inbound (Driving) ports: admin query API
//! - Outbound (Driven) ports: append-only entry store

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
