//! Collaborator trait definitions for the domain layer.
//!
//! The resolution pipeline depends only on these narrow contracts; the
//! storage technology behind each one is an infrastructure concern.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure`
//! - Mock implementations are auto-generated via `mockall` for unit tests
//!
//! # Available Collaborators
//!
//! - [`LinkStore`] - Durable code → link mapping and click counters
//! - [`ClickLog`] - Append-only click-event log
//! - [`HotRanking`] - Popularity ranking keyed by code

pub mod click_log;
pub mod hot_ranking;
pub mod link_store;

pub use click_log::ClickLog;
pub use hot_ranking::{HotRanking, HotScore, RankingError};
pub use link_store::LinkStore;

#[cfg(test)]
pub use click_log::MockClickLog;
#[cfg(test)]
pub use hot_ranking::MockHotRanking;
#[cfg(test)]
pub use link_store::MockLinkStore;
