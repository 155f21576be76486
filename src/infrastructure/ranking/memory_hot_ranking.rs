//! Process-local hot ranking.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::repositories::{HotRanking, HotScore, RankingError};

#[derive(Debug, Clone, Copy)]
struct Entry {
    score: u64,
    // Order of the first increment, used to break ties.
    seq: u64,
}

/// In-memory ranking backed by a [`DashMap`].
///
/// Ties are ordered by which code was first incremented.
#[derive(Debug, Default)]
pub struct InMemoryHotRanking {
    scores: DashMap<String, Entry>,
    next_seq: AtomicU64,
}

impl InMemoryHotRanking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current score of `code`, zero if it was never incremented.
    pub fn score(&self, code: &str) -> u64 {
        self.scores.get(code).map(|e| e.score).unwrap_or(0)
    }
}

#[async_trait]
impl HotRanking for InMemoryHotRanking {
    async fn increment(&self, code: &str) -> Result<(), RankingError> {
        self.scores
            .entry(code.to_string())
            .or_insert_with(|| Entry {
                score: 0,
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            })
            .score += 1;
        Ok(())
    }

    async fn top(&self, k: usize) -> Result<Vec<HotScore>, RankingError> {
        let mut entries: Vec<(String, Entry)> = self
            .scores
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();

        entries.sort_by(|(_, a), (_, b)| b.score.cmp(&a.score).then(a.seq.cmp(&b.seq)));

        Ok(entries
            .into_iter()
            .take(k)
            .map(|(code, entry)| HotScore {
                code,
                score: entry.score,
            })
            .collect())
    }

    async fn remove(&self, code: &str) -> Result<(), RankingError> {
        self.scores.remove(code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn bump(ranking: &InMemoryHotRanking, code: &str, times: usize) {
        for _ in 0..times {
            ranking.increment(code).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_top_orders_by_descending_score() {
        let ranking = InMemoryHotRanking::new();
        bump(&ranking, "x", 5).await;
        bump(&ranking, "y", 3).await;
        bump(&ranking, "z", 9).await;

        let top = ranking.top(2).await.unwrap();

        assert_eq!(
            top,
            vec![
                HotScore { code: "z".to_string(), score: 9 },
                HotScore { code: "x".to_string(), score: 5 },
            ]
        );
    }

    #[tokio::test]
    async fn test_ties_keep_first_increment_order() {
        let ranking = InMemoryHotRanking::new();
        bump(&ranking, "late", 1).await;
        bump(&ranking, "early", 1).await;
        bump(&ranking, "late", 1).await;
        bump(&ranking, "early", 1).await;

        let first = ranking.top(10).await.unwrap();
        let second = ranking.top(10).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].code, "late");
        assert_eq!(first[1].code, "early");
    }

    #[tokio::test]
    async fn test_top_larger_than_population() {
        let ranking = InMemoryHotRanking::new();
        bump(&ranking, "only", 2).await;

        assert_eq!(ranking.top(100).await.unwrap().len(), 1);
        assert!(ranking.top(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_drops_code() {
        let ranking = InMemoryHotRanking::new();
        bump(&ranking, "gone", 4).await;

        ranking.remove("gone").await.unwrap();

        assert_eq!(ranking.score("gone"), 0);
        assert!(ranking.top(10).await.unwrap().is_empty());
    }
}
