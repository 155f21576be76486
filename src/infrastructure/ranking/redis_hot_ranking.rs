//! Redis sorted-set ranking.

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::debug;

use crate::domain::repositories::{HotRanking, HotScore, RankingError};

const HOT_KEY: &str = "hot:links";

/// Hot ranking stored in the `hot:links` sorted set.
///
/// Scores are incremented with `ZINCRBY` and read with `ZREVRANGE ... WITHSCORES`.
/// Equal scores come back in Redis' reverse lexicographic member order, which
/// is stable between calls.
pub struct RedisHotRanking {
    conn: ConnectionManager,
}

impl RedisHotRanking {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

fn unavailable(op: &str, e: redis::RedisError) -> RankingError {
    RankingError::Unavailable(format!("{op}: {e}"))
}

#[async_trait]
impl HotRanking for RedisHotRanking {
    async fn increment(&self, code: &str) -> Result<(), RankingError> {
        let mut conn = self.conn.clone();
        let score: f64 = conn
            .zincr(HOT_KEY, code, 1)
            .await
            .map_err(|e| unavailable("ZINCRBY", e))?;

        debug!(code, score, "Hot score incremented");
        Ok(())
    }

    async fn top(&self, k: usize) -> Result<Vec<HotScore>, RankingError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let stop = isize::try_from(k - 1).unwrap_or(isize::MAX);
        let entries: Vec<(String, f64)> = conn
            .zrevrange_withscores(HOT_KEY, 0, stop)
            .await
            .map_err(|e| unavailable("ZREVRANGE", e))?;

        Ok(entries
            .into_iter()
            .map(|(code, score)| HotScore {
                code,
                score: score.max(0.0) as u64,
            })
            .collect())
    }

    async fn remove(&self, code: &str) -> Result<(), RankingError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn
            .zrem(HOT_KEY, code)
            .await
            .map_err(|e| unavailable("ZREM", e))?;
        Ok(())
    }
}
