//! # tinylink
//!
//! A small URL shortener: it maps long URLs to short random identifiers,
//! redirects identifiers back to their targets, and counts redirects.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, the storage trait, and the click pipeline
//! - **Application Layer** ([`application`]) - Shortening, resolution and statistics services
//! - **Infrastructure Layer** ([`infrastructure`]) - The in-memory store
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Idempotent shortening: one identifier per target, even under races
//! - Collision-checked identifiers with a bounded retry budget
//! - Click counting off the redirect path via a single-consumer queue
//! - Graceful shutdown that drains queued clicks
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run -- -p 1234
//! curl -i -X POST localhost:1234/api/shorten -H 'content-type: application/json' \
//!      -d '{"url": "http://example.com"}'
//! ```
//!
//! ## Configuration
//!
//! See [`config`] for environment variables and flags.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, Shortened, StatsService};
    pub use crate::domain::click_worker::{ClickPipeline, ClickSender, ClickWorkerHandle};
    pub use crate::domain::entities::{Link, LinkStats};
    pub use crate::domain::repositories::UrlRepository;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::MemoryUrlRepository;
    pub use crate::state::AppState;
    pub use crate::utils::id_generator::IdGenerator;
}
