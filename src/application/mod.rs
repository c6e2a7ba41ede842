//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Lookup-or-create shortening and resolution
//! - [`services::stats_service::StatsService`] - Click statistics snapshots

pub mod services;
