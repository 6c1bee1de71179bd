//! Cross-subsystem flows driven through the `CareApi` facade.

pub mod fixtures;

mod access;
mod audit;
mod donors;
mod funding;
mod lifecycle;
