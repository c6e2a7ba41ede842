//! Repository implementations.
//!
//! # Repositories
//!
//! - [`MemoryUrlRepository`] - Links and click counters held in process memory

pub mod memory_url_repository;

pub use memory_url_repository::MemoryUrlRepository;
