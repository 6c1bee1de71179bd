//! # CareBridge Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks through the facade
//! └── src/integration/  # Cross-subsystem flows
//!     ├── fixtures.rs   # Wired runtime with a pinned clock
//!     ├── lifecycle.rs  # Case from creation to transplant
//!     ├── access.rs     # Role and approval matrix
//!     ├── donors.rs     # Registration and consent
//!     ├── funding.rs    # Contributions, concurrency
//!     └── audit.rs      # Audit trail and best-effort writes
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p care-tests
//!
//! # One flow
//! cargo test -p care-tests integration::funding::
//!
//! # Benchmarks
//! cargo bench -p care-tests
//! ```

#![allow(dead_code)]

pub mod integration;
