//! Link shortening and resolution service.

use std::sync::Arc;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::Link;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::id_generator::IdGenerator;
use crate::utils::url_validator::validate_target;
use serde_json::json;
use tracing::{debug, info};

/// Outcome of [`LinkService::find_or_create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub link: Link,
    /// `true` when this call created the link.
    pub is_new: bool,
}

/// Service for creating and resolving shortened links.
///
/// Shortening is idempotent: the same target always maps to the same
/// identifier, including when two requests race on a target nobody has seen
/// yet (the store's atomic insert decides the winner).
pub struct LinkService<R: UrlRepository> {
    repository: Arc<R>,
    generator: IdGenerator,
    clock: Arc<dyn Clock>,
}

impl<R: UrlRepository> LinkService<R> {
    /// Creates a new link service stamping links with the system clock.
    pub fn new(repository: Arc<R>, generator: IdGenerator) -> Self {
        Self::with_clock(repository, generator, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, generator: IdGenerator, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            generator,
            clock,
        }
    }

    /// Returns the existing link for `target`, or creates one.
    ///
    /// # Flow
    ///
    /// 1. Reverse lookup by target; a hit is returned with `is_new = false`
    /// 2. Target validation (absolute, hierarchical URL)
    /// 3. Fresh identifier from the generator
    /// 4. Atomic insert-if-absent keyed by target
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the target is not a valid absolute
    /// URL. Nothing is stored in that case.
    /// Returns [`AppError::GenerationExhausted`] if no free identifier was found.
    /// Returns [`AppError::Storage`] on store faults.
    pub async fn find_or_create(&self, target: &str) -> Result<Shortened, AppError> {
        if let Some(existing) = self.repository.find_by_target(target).await? {
            debug!(id = %existing.id, target, "Target already shortened");
            return Ok(Shortened {
                link: existing,
                is_new: false,
            });
        }

        validate_target(target).map_err(|e| {
            AppError::bad_request(
                "Invalid URL format",
                json!({ "url": target, "reason": e.to_string() }),
            )
        })?;

        let id = self.generator.generate(self.repository.as_ref()).await?;
        let candidate = Link::new(id, target.to_string(), self.clock.now());

        let stored = self
            .repository
            .save_if_target_absent(candidate.clone())
            .await?;

        let is_new = stored.id == candidate.id;
        if is_new {
            info!(id = %stored.id, target, "Link created");
        } else {
            debug!(id = %stored.id, target, "Concurrent request created the link first");
        }

        Ok(Shortened {
            link: stored,
            is_new,
        })
    }

    /// Looks up a link by identifier. `Ok(None)` means "not found".
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store faults.
    pub async fn resolve(&self, id: &str) -> Result<Option<Link>, AppError> {
        self.repository.find_by_id(id).await
    }

    /// Like [`Self::resolve`] but reports absence as [`AppError::NotFound`].
    pub async fn get_link(&self, id: &str) -> Result<Link, AppError> {
        self.resolve(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    /// Number of stored links; doubles as a store liveness probe.
    pub async fn count_links(&self) -> Result<u64, AppError> {
        self.repository.count_links().await
    }

    /// Builds the public short URL for `id`.
    pub fn short_url(&self, base_url: &str, id: &str) -> String {
        format!("{}/go.to/{}", base_url.trim_end_matches('/'), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::repositories::MockUrlRepository;
    use chrono::{TimeZone, Utc};

    fn create_test_link(id: &str, target: &str) -> Link {
        Link::new(id.to_string(), target.to_string(), Utc::now())
    }

    #[tokio::test]
    async fn test_find_or_create_new_link() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_find_by_target()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_id_exists()
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_save_if_target_absent()
            .withf(|link| link.target == "http://example.com")
            .times(1)
            .returning(|link| Ok(link));

        let created_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let service = LinkService::with_clock(
            Arc::new(mock_repo),
            IdGenerator::with_seed(3, 5, 10),
            Arc::new(FixedClock(created_at)),
        );

        let result = service.find_or_create("http://example.com").await.unwrap();

        assert!(result.is_new);
        assert_eq!(result.link.target, "http://example.com");
        assert_eq!(result.link.id.len(), 5);
        assert_eq!(result.link.created_at, created_at);
    }

    #[tokio::test]
    async fn test_find_or_create_returns_existing() {
        let mut mock_repo = MockUrlRepository::new();

        let existing = create_test_link("ab12_", "http://example.com");
        mock_repo
            .expect_find_by_target()
            .withf(|target| target == "http://example.com")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_id_exists().times(0);
        mock_repo.expect_save_if_target_absent().times(0);

        let service = LinkService::new(Arc::new(mock_repo), IdGenerator::default());

        let result = service.find_or_create("http://example.com").await.unwrap();

        assert!(!result.is_new);
        assert_eq!(result.link.id, "ab12_");
    }

    #[tokio::test]
    async fn test_find_or_create_invalid_url() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_target()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_save_if_target_absent().times(0);

        let service = LinkService::new(Arc::new(mock_repo), IdGenerator::default());

        let result = service.find_or_create("not a url").await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_find_or_create_lost_race_returns_winner() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_target()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_id_exists().returning(|_| Ok(false));

        let winner = create_test_link("WiNnR", "https://example.com/race");
        mock_repo
            .expect_save_if_target_absent()
            .times(1)
            .returning(move |_| Ok(winner.clone()));

        let service = LinkService::new(Arc::new(mock_repo), IdGenerator::default());

        let result = service
            .find_or_create("https://example.com/race")
            .await
            .unwrap();

        assert!(!result.is_new);
        assert_eq!(result.link.id, "WiNnR");
    }

    #[tokio::test]
    async fn test_find_or_create_generation_exhausted() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_target()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_id_exists()
            .times(2)
            .returning(|_| Ok(true));
        mock_repo.expect_save_if_target_absent().times(0);

        let service = LinkService::new(Arc::new(mock_repo), IdGenerator::new(5, 2));

        let result = service.find_or_create("https://example.com").await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::GenerationExhausted { attempts: 2 }
        ));
    }

    #[tokio::test]
    async fn test_find_or_create_storage_fault_propagates() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_target()
            .times(1)
            .returning(|_| Err(AppError::storage("Store lock poisoned", json!({}))));

        let service = LinkService::new(Arc::new(mock_repo), IdGenerator::default());

        let result = service.find_or_create("https://example.com").await;

        assert!(matches!(result.unwrap_err(), AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_resolve_missing_is_none() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(2)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo), IdGenerator::default());

        assert!(service.resolve("doesnotexist").await.unwrap().is_none());
        assert!(matches!(
            service.get_link("doesnotexist").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[test]
    fn test_short_url() {
        let service = LinkService::new(
            Arc::new(MockUrlRepository::new()),
            IdGenerator::default(),
        );

        assert_eq!(
            service.short_url("http://0.0.0.0:1234/", "ab12_"),
            "http://0.0.0.0:1234/go.to/ab12_"
        );
    }
}
