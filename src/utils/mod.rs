//! Helpers used by the services and handlers.
//!
//! - [`id_generator`] - Random, collision-checked identifier generation
//! - [`url_validator`] - Absolute-URL validation for shortening targets

pub mod id_generator;
pub mod url_validator;
