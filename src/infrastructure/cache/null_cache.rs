//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::LinkSnapshot;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is not configured or unreachable at startup. Every lookup
/// is a miss, so each redirect goes to the link store.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_link(&self, _code: &str) -> CacheResult<Option<LinkSnapshot>> {
        Ok(None)
    }

    async fn set_link(
        &self,
        _code: &str,
        _snapshot: &LinkSnapshot,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();
        let snapshot = LinkSnapshot {
            target_url: "https://example.com".to_string(),
            expires_at: None,
            click_count: 0,
        };

        cache.set_link("abc123", &snapshot, None).await.unwrap();

        assert!(cache.get_link("abc123").await.unwrap().is_none());
        assert!(cache.health_check().await);
    }
}
