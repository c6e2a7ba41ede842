//! Repository trait for short link and click counter storage.

use crate::domain::entities::Link;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage capability for links and their click counters.
///
/// The store is the single source of truth for identifier uniqueness and the
/// only component that mutates persisted state. Entity writes and counter
/// writes are serialized independently by each implementation; callers never
/// lock around these calls.
///
/// Every method returns [`AppError::Storage`] on an underlying fault. Absence
/// is reported as `Ok(None)` / `Ok(false)` / `Ok(0)`, never as an error.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - in-process maps
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_memory.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Returns `true` if a link with this identifier was saved.
    async fn id_exists(&self, id: &str) -> Result<bool, AppError>;

    /// Point lookup by identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<Link>, AppError>;

    /// Reverse lookup by target URL (exact string match).
    async fn find_by_target(&self, target: &str) -> Result<Option<Link>, AppError>;

    /// Inserts a link keyed by its identifier.
    ///
    /// The caller guarantees the identifier is unused (see
    /// [`crate::utils::id_generator::IdGenerator`]).
    async fn save(&self, link: Link) -> Result<(), AppError>;

    /// Inserts `link` unless another link already owns its target.
    ///
    /// Returns whichever link is stored for the target once the call
    /// completes: `link` itself when it was inserted, the earlier one
    /// otherwise. The check and the insert happen atomically.
    async fn save_if_target_absent(&self, link: Link) -> Result<Link, AppError>;

    /// Increments the click counter for `id`, creating it at 1.
    ///
    /// Does not require a link with that identifier to exist.
    async fn register_click(&self, id: &str) -> Result<(), AppError>;

    /// Current click count for `id`, 0 if none were recorded.
    async fn fetch_click_stats(&self, id: &str) -> Result<u64, AppError>;

    /// Number of stored links.
    async fn count_links(&self) -> Result<u64, AppError>;
}
