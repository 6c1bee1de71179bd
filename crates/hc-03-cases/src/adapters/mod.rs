//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory case table and blob store.

mod files;
mod memory;

pub use files::InMemoryFileStore;
pub use memory::InMemoryCaseRepository;
