//! Short code resolution with cache-aside lookup and click dispatch.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::application::services::ClickRecorder;
use crate::domain::click_event::ClickEvent;
use crate::domain::entities::LinkSnapshot;
use crate::domain::repositories::LinkStore;
use crate::error::{AppError, MAX_ALIAS_LENGTH};
use crate::infrastructure::cache::CacheService;

/// Resolves short codes to redirect targets.
///
/// # Flow
///
/// 1. Read the cache; a cache error counts as a miss
/// 2. On a miss, read the link store and repopulate the cache with the default TTL
/// 3. Reject expired links, judged by the snapshot's own expiry
/// 4. Hand the click to [`ClickRecorder`] and return the target without waiting
///
/// Store failures are surfaced as [`AppError::StoreUnavailable`] and never retried.
pub struct RedirectPipeline {
    links: Arc<dyn LinkStore>,
    cache: Arc<dyn CacheService>,
    recorder: ClickRecorder,
}

impl RedirectPipeline {
    pub fn new(
        links: Arc<dyn LinkStore>,
        cache: Arc<dyn CacheService>,
        recorder: ClickRecorder,
    ) -> Self {
        Self {
            links,
            cache,
            recorder,
        }
    }

    pub fn recorder(&self) -> &ClickRecorder {
        &self.recorder
    }

    /// Resolves `code` and dispatches click recording.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - no link with this code
    /// - [`AppError::Expired`] - the link's expiry has passed; nothing is recorded
    /// - [`AppError::StoreUnavailable`] - cache miss and the store failed
    pub async fn resolve(
        &self,
        code: &str,
        client_ip: &str,
        user_agent: Option<&str>,
        referrer: Option<&str>,
    ) -> Result<String, AppError> {
        let snapshot = self
            .lookup(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))?;

        if snapshot.is_expired_at(Utc::now()) {
            debug!(code, "Short link expired");
            return Err(AppError::expired(code));
        }

        self.recorder.record(ClickEvent::new(
            code.to_string(),
            client_ip.to_string(),
            user_agent,
            referrer,
        ));

        Ok(snapshot.target_url)
    }

    async fn lookup(&self, code: &str) -> Result<Option<LinkSnapshot>, AppError> {
        if code.is_empty() || code.chars().count() > MAX_ALIAS_LENGTH {
            return Ok(None);
        }

        match self.cache.get_link(code).await {
            Ok(Some(snapshot)) => return Ok(Some(snapshot)),
            Ok(None) => {}
            Err(e) => {
                warn!(code, error = %e, "Cache read failed, falling back to link store");
                metrics::counter!("cache_errors_total", "op" => "get").increment(1);
            }
        }

        let Some(link) = self.links.get_by_code(code).await? else {
            return Ok(None);
        };

        let snapshot = link.snapshot();
        if let Err(e) = self.cache.set_link(code, &snapshot, None).await {
            warn!(code, error = %e, "Cache population failed");
            metrics::counter!("cache_errors_total", "op" => "set").increment(1);
        }

        Ok(Some(snapshot))
    }
}
