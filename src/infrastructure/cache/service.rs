//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::LinkSnapshot;

/// Errors that can occur during cache operations.
///
/// These never reach HTTP callers: the redirect pipeline treats every cache
/// error as a miss.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
    #[error("Cache entry is corrupt: {0}")]
    CorruptEntry(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-aside store for link snapshots keyed by short code.
///
/// Implementations report failures honestly; the fail-open policy belongs to
/// the caller (see [`crate::application::services::RedirectPipeline`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached snapshot for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(snapshot))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_link(&self, code: &str) -> CacheResult<Option<LinkSnapshot>>;

    /// Stores a snapshot with an optional TTL.
    ///
    /// `ttl_seconds = None` applies the implementation's default TTL.
    async fn set_link(
        &self,
        code: &str,
        snapshot: &LinkSnapshot,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached snapshot. Used when a link is deleted.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
