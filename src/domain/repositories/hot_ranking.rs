//! Popularity ranking contract.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors reported by a ranking backend.
#[derive(Debug, Clone, Error)]
pub enum RankingError {
    #[error("ranking backend unavailable: {0}")]
    Unavailable(String),
}

/// A code and its cumulative click score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotScore {
    pub code: String,
    pub score: u64,
}

/// Sorted popularity structure keyed by short code.
///
/// Scores grow by one per recorded click and never decay. `top` orders by
/// descending score; ties are broken deterministically so that repeated calls
/// with no intervening increments return the same sequence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotRanking: Send + Sync {
    /// Adds one to the score of `code`, creating the entry if needed.
    async fn increment(&self, code: &str) -> Result<(), RankingError>;

    /// Returns up to `k` entries ordered by descending score.
    async fn top(&self, k: usize) -> Result<Vec<HotScore>, RankingError>;

    /// Removes `code` from the ranking. Removing an absent code is not an error.
    async fn remove(&self, code: &str) -> Result<(), RankingError>;
}
