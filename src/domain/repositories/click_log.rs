//! Click-event log contract.

use crate::domain::entities::NewClick;
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only log of classified click events.
///
/// Aggregation reports read this log directly; the pipeline only appends.
/// Events outlive the deletion of their link and are removed only through
/// [`ClickLog::purge_by_code`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickLog: Send + Sync {
    /// Appends a click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on backend errors.
    async fn append(&self, click: NewClick) -> Result<(), AppError>;

    /// Counts the stored events for a code.
    async fn count_by_code(&self, code: &str) -> Result<i64, AppError>;

    /// Deletes every stored event for a code, returning how many were removed.
    async fn purge_by_code(&self, code: &str) -> Result<u64, AppError>;
}
