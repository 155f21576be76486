//! Popularity ranking of short codes.
//!
//! Implementations of [`crate::domain::repositories::HotRanking`]:
//! - [`RedisHotRanking`] - Redis sorted set shared across instances
//! - [`InMemoryHotRanking`] - Process-local ranking, used when Redis is not configured

mod memory_hot_ranking;
mod redis_hot_ranking;

pub use memory_hot_ranking::InMemoryHotRanking;
pub use redis_hot_ranking::RedisHotRanking;
