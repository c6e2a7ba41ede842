//! Core domain entities.
//!
//! - [`Link`] - An immutable mapping from a short identifier to a target URL
//! - [`LinkStats`] - A point-in-time snapshot of a link and its click count
//!
//! Entities are plain data. Creation rules live in
//! [`crate::application::services::LinkService`].

pub mod link;

pub use link::{Link, LinkStats};
