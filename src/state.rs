//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, StatsService};
use crate::domain::click_worker::ClickSender;
use crate::infrastructure::persistence::MemoryUrlRepository;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<MemoryUrlRepository>>,
    pub stats_service: Arc<StatsService<MemoryUrlRepository>>,
    pub click_sender: ClickSender,
    /// Prefix for generated short URLs, without a trailing slash.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<MemoryUrlRepository>>,
        stats_service: Arc<StatsService<MemoryUrlRepository>>,
        click_sender: ClickSender,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_service,
            stats_service,
            click_sender,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}
