//! # Funding Ledger
//!
//! **Subsystem ID:** 4
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Append-only record of sponsor contributions. Each contribution is the
//! only way a case's `funding_amount` changes.
//!
//! ## Contribution Flow
//!
//! ```text
//! contribute(sponsor, case, amount > 0)
//!     │
//!     └── FundingStore::append ─┬─ case.funding_amount += amount
//!                               ├─ status → funded when amount ≥ goal > 0
//!                               │  (from waiting or matched only)
//!                               ├─ ledger row appended
//!                               └─ sponsor total_funded / funded_count
//! ```
//!
//! All four effects commit together. Concurrent sponsors funding the same
//! case serialize on the case row, so no increment is lost.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/ - InMemoryFundingStore
//! ports/    - FundingApi (inbound), FundingStore (outbound)
//! domain/   - FundingContribution, SponsorTotals, ContributionReceipt
//! service   - FundingLedger
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::FundingLedger;
