//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementation of [`DonorRepository`](crate::ports::DonorRepository).

mod memory;

pub use memory::InMemoryDonorRepository;
