//! Storage implementations of the link store and click log.
//!
//! PostgreSQL implementations use SQLx runtime queries against the schema in
//! `migrations/`; the in-memory ones back tests and database-less runs.
//!
//! # Implementations
//!
//! - [`PgLinkStore`] - Link storage, uniqueness and counters
//! - [`PgClickLog`] - Click-event log
//! - [`InMemoryLinkStore`] / [`InMemoryClickLog`] - Process-local equivalents

pub mod memory;
pub mod pg_click_log;
pub mod pg_link_store;

pub use memory::{InMemoryClickLog, InMemoryLinkStore};
pub use pg_click_log::PgClickLog;
pub use pg_link_store::PgLinkStore;
