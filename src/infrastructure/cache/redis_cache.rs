//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::LinkSnapshot;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

const KEY_PREFIX: &str = "link:";

/// Redis cache for link snapshots.
///
/// Snapshots are stored as JSON under `link:<code>` with `SETEX`. Uses
/// `ConnectionManager` for automatic reconnection and connection reuse.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Wraps an established connection and configures the default TTL.
    ///
    /// `default_ttl_seconds` is applied when [`CacheService::set_link`] is
    /// called with `ttl_seconds = None`; controlled via `CACHE_TTL_SECONDS`.
    pub fn new(conn: ConnectionManager, default_ttl_seconds: u64) -> Self {
        Self {
            conn,
            default_ttl: default_ttl_seconds,
        }
    }

    fn build_key(code: &str) -> String {
        format!("{KEY_PREFIX}{code}")
    }
}

/// Opens a managed Redis connection and checks it with a PING.
///
/// Shared by the cache and the hot ranking so both use one connection.
pub async fn connect_manager(redis_url: &str) -> CacheResult<ConnectionManager> {
    info!("Connecting to Redis");

    let client = Client::open(redis_url)
        .map_err(|e| CacheError::ConnectionError(format!("Failed to create Redis client: {e}")))?;

    let manager = ConnectionManager::new(client)
        .await
        .map_err(|e| CacheError::ConnectionError(format!("Failed to connect to Redis: {e}")))?;

    let mut test_conn = manager.clone();
    test_conn
        .ping::<()>()
        .await
        .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {e}")))?;

    info!("✓ Connected to Redis");
    Ok(manager)
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, code: &str) -> CacheResult<Option<LinkSnapshot>> {
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn
            .get(Self::build_key(code))
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {code}: {e}")))?;

        match raw {
            Some(json) => {
                let snapshot = serde_json::from_str(&json)
                    .map_err(|e| CacheError::CorruptEntry(format!("{code}: {e}")))?;
                debug!(code, "Cache HIT");
                Ok(Some(snapshot))
            }
            None => {
                debug!(code, "Cache MISS");
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        code: &str,
        snapshot: &LinkSnapshot,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let json = serde_json::to_string(snapshot)
            .map_err(|e| CacheError::OperationError(format!("serialize {code}: {e}")))?;

        conn.set_ex::<_, _, ()>(Self::build_key(code), json, ttl)
            .await
            .map_err(|e| CacheError::OperationError(format!("SETEX {code}: {e}")))?;

        debug!(code, ttl, "Cache SET");
        Ok(())
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        let deleted: i64 = conn
            .del(Self::build_key(code))
            .await
            .map_err(|e| CacheError::OperationError(format!("DEL {code}: {e}")))?;

        if deleted > 0 {
            debug!(code, "Cache INVALIDATE");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
