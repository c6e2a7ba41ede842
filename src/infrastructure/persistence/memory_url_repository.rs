//! In-memory implementation of the URL repository.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::entities::Link;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Links keyed by identifier plus the reverse index by target.
///
/// Both maps sit behind one lock so they never disagree.
#[derive(Default)]
struct LinkTable {
    by_id: HashMap<String, Link>,
    by_target: HashMap<String, String>,
}

/// Process-local store backed by two independently locked maps.
///
/// Link writes and counter writes take different locks, so click counting
/// never contends with shortening. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryUrlRepository {
    links: RwLock<LinkTable>,
    clicks: RwLock<HashMap<String, u64>>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> AppError {
    AppError::storage(
        "Store lock poisoned",
        json!({ "reason": "a writer panicked while holding the lock" }),
    )
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn id_exists(&self, id: &str) -> Result<bool, AppError> {
        let table = self.links.read().map_err(poisoned)?;
        Ok(table.by_id.contains_key(id))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Link>, AppError> {
        let table = self.links.read().map_err(poisoned)?;
        Ok(table.by_id.get(id).cloned())
    }

    async fn find_by_target(&self, target: &str) -> Result<Option<Link>, AppError> {
        let table = self.links.read().map_err(poisoned)?;
        Ok(table
            .by_target
            .get(target)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn save(&self, link: Link) -> Result<(), AppError> {
        let mut table = self.links.write().map_err(poisoned)?;

        // First link saved for a target keeps the reverse mapping.
        table
            .by_target
            .entry(link.target.clone())
            .or_insert_with(|| link.id.clone());
        table.by_id.insert(link.id.clone(), link);

        Ok(())
    }

    async fn save_if_target_absent(&self, link: Link) -> Result<Link, AppError> {
        let mut table = self.links.write().map_err(poisoned)?;

        if let Some(existing) = table
            .by_target
            .get(&link.target)
            .and_then(|id| table.by_id.get(id))
        {
            return Ok(existing.clone());
        }

        table.by_target.insert(link.target.clone(), link.id.clone());
        table.by_id.insert(link.id.clone(), link.clone());

        Ok(link)
    }

    async fn register_click(&self, id: &str) -> Result<(), AppError> {
        let mut clicks = self.clicks.write().map_err(poisoned)?;
        *clicks.entry(id.to_string()).or_insert(0) += 1;
        Ok(())
    }

    async fn fetch_click_stats(&self, id: &str) -> Result<u64, AppError> {
        let clicks = self.clicks.read().map_err(poisoned)?;
        Ok(clicks.get(id).copied().unwrap_or(0))
    }

    async fn count_links(&self) -> Result<u64, AppError> {
        let table = self.links.read().map_err(poisoned)?;
        Ok(table.by_id.len() as u64)
    }
}
