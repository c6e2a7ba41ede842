//! Domain layer containing business entities and logic.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits define contracts implemented by the
//! infrastructure layer.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`clock`] - Time source for creation timestamps
//! - [`click_event`] - Click pipeline messages
//! - [`click_worker`] - Asynchronous single-consumer click counter
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves an identifier and answers with a redirect
//! 2. The identifier is pushed through a [`click_worker::ClickSender`]
//! 3. [`click_worker::run_click_worker`] applies increments one at a time
//! 4. Counts are read back via [`repositories::UrlRepository::fetch_click_stats`]

pub mod click_event;
pub mod click_worker;
pub mod clock;
pub mod entities;
pub mod repositories;
