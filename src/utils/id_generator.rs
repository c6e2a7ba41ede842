//! Short identifier generation.
//!
//! Identifiers are drawn uniformly from a 64-symbol URL-safe alphabet. With
//! the default length of 5 that gives 64^5 (about 1.07e9) possible values, so
//! collisions stay rare while the store is small. Uniqueness never depends on
//! luck though: every candidate is checked against the repository before it is
//! handed out, and generation gives up after a fixed number of attempts.

use std::sync::{LazyLock, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use tracing::debug;

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Symbols an identifier may contain.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-+";

pub const DEFAULT_ID_LENGTH: usize = 5;
pub const DEFAULT_MAX_ATTEMPTS: usize = 32;

/// Longest identifier length the service accepts.
pub const MAX_ID_LENGTH: usize = 32;

static ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_+-]+$").unwrap());

/// Returns true if `id` could have been produced by an [`IdGenerator`].
///
/// Lets request handlers answer "not found" for garbage without touching the
/// store.
pub fn is_well_formed_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_ID_LENGTH && ID_REGEX.is_match(id)
}

/// Produces fixed-length random identifiers that are unused in a repository.
pub struct IdGenerator {
    rng: Mutex<StdRng>,
    length: usize,
    max_attempts: usize,
}

impl IdGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn new(length: usize, max_attempts: usize) -> Self {
        Self::with_rng(StdRng::from_os_rng(), length, max_attempts)
    }

    /// Creates a deterministic generator. Two generators with the same seed
    /// produce the same candidate sequence.
    pub fn with_seed(seed: u64, length: usize, max_attempts: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), length, max_attempts)
    }

    fn with_rng(rng: StdRng, length: usize, max_attempts: usize) -> Self {
        Self {
            rng: Mutex::new(rng),
            length: length.clamp(1, MAX_ID_LENGTH),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Draws one random identifier without checking for collisions.
    pub fn candidate(&self) -> String {
        // RNG state stays valid even if another thread panicked mid-draw.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }

    /// Generates an identifier the repository does not know yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::GenerationExhausted`] when every one of
    /// `max_attempts` candidates collided.
    /// Propagates [`AppError::Storage`] from the existence check.
    pub async fn generate<R>(&self, repository: &R) -> Result<String, AppError>
    where
        R: UrlRepository + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let id = self.candidate();

            if !repository.id_exists(&id).await? {
                return Ok(id);
            }

            debug!(attempt, id = %id, "Identifier collision, retrying");
        }

        Err(AppError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("length", &self.length)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}
