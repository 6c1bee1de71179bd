//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports. A relational store with
//! row-level policies replaces them in deployment.

mod credentials;
mod memory;

pub use credentials::{InMemoryCredentialStore, PasswordHashing};
pub use memory::InMemoryUserRepository;
