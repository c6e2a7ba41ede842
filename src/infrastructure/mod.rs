//! Infrastructure layer.
//!
//! Implements the storage contract defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Repository implementations (in-memory)

pub mod persistence;
