//! Infrastructure layer for external integrations.
//!
//! This layer implements the collaborator contracts defined by the domain
//! layer.
//!
//! # Modules
//!
//! - [`cache`] - Resolution cache (Redis and no-op implementations)
//! - [`persistence`] - Link store and click log (PostgreSQL and in-memory)
//! - [`ranking`] - Hot ranking (Redis and in-memory)

pub mod cache;
pub mod persistence;
pub mod ranking;
