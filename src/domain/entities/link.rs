//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shortened URL.
///
/// Created once, on first sight of a target, and never mutated afterwards.
/// `id` is unique for the lifetime of the store and `target` maps to at most
/// one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(id: String, target: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            target,
            created_at,
        }
    }
}

/// A link together with its click count at the moment of the read.
///
/// Not persisted. The count may lag behind clicks still queued in the click
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub link: Link,
    pub clicks: u64,
}
