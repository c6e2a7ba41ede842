//! Click statistics service.

use std::sync::Arc;

use crate::domain::entities::{Link, LinkStats};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use serde_json::json;

/// Assembles point-in-time statistics snapshots.
///
/// Counts come straight from the repository and may trail clicks that are
/// still queued in the click pipeline.
pub struct StatsService<R: UrlRepository> {
    repository: Arc<R>,
}

impl<R: UrlRepository> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Attaches the current click count to a known link.
    ///
    /// A link that was never clicked reports 0.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store faults.
    pub async fn stats(&self, link: Link) -> Result<LinkStats, AppError> {
        let clicks = self.repository.fetch_click_stats(&link.id).await?;
        Ok(LinkStats { link, clicks })
    }

    /// Statistics for an identifier; `Ok(None)` if no link has that id.
    pub async fn stats_by_id(&self, id: &str) -> Result<Option<LinkStats>, AppError> {
        match self.repository.find_by_id(id).await? {
            Some(link) => Ok(Some(self.stats(link).await?)),
            None => Ok(None),
        }
    }

    /// Like [`Self::stats_by_id`] but reports absence as [`AppError::NotFound`].
    pub async fn get_stats(&self, id: &str) -> Result<LinkStats, AppError> {
        self.stats_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Statistics not found", json!({ "id": id })))
    }
}
