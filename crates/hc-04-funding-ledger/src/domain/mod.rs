//! # Domain Layer - Funding Ledger
//!
//! - `entities`: FundingContribution, SponsorTotals, ContributionReceipt

pub mod entities;

pub use entities::*;
