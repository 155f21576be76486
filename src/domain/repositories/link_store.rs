//! Durable link storage contract.

use crate::domain::entities::{Link, LinkPage, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable mapping of short code → link record, plus click counters.
///
/// The store is the single source of truth and serializes conflicting
/// writes itself: code uniqueness is enforced at insert time, not by
/// callers checking first.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkStore`] - Process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on backend errors.
    async fn get_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns true if a link with this code exists.
    ///
    /// Advisory only: a `false` answer can be invalidated by a concurrent
    /// insert before the caller acts on it.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Inserts a new link, atomically enforcing code uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasConflict`] if the code is already taken.
    /// Returns [`AppError::StoreUnavailable`] on backend errors.
    async fn insert_unique(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Increments the durable click counter of a link by one.
    ///
    /// Incrementing a code that no longer exists is not an error.
    async fn increment_counter(&self, code: &str) -> Result<(), AppError>;

    /// Deletes a link owned by `owner_id`.
    ///
    /// Returns `Ok(true)` if a link was removed, `Ok(false)` if no link with
    /// this code belongs to the owner.
    async fn delete_by_code(&self, code: &str, owner_id: i64) -> Result<bool, AppError>;

    /// Lists the links of `owner_id`, newest first.
    ///
    /// Skips `offset` links and returns at most `limit`; `total` counts every
    /// link the owner has.
    async fn list_by_owner(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<LinkPage, AppError>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
