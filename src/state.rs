//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ClickRecorder, CodeGenerator, LinkService, RedirectPipeline};
use crate::domain::repositories::{HotRanking, LinkStore};
use crate::infrastructure::cache::CacheService;

/// Handles to the services and collaborators behind the HTTP adapter.
///
/// Cheap to clone; every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RedirectPipeline>,
    pub link_service: Arc<LinkService>,
    pub links: Arc<dyn LinkStore>,
    pub cache: Arc<dyn CacheService>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services over the given collaborators.
    ///
    /// `recorder` must feed a running click worker; see
    /// [`crate::domain::click_worker::run_click_worker`].
    pub fn new(
        links: Arc<dyn LinkStore>,
        cache: Arc<dyn CacheService>,
        ranking: Arc<dyn HotRanking>,
        recorder: ClickRecorder,
        generator: CodeGenerator,
        behind_proxy: bool,
    ) -> Self {
        let pipeline = RedirectPipeline::new(links.clone(), cache.clone(), recorder);
        let link_service = LinkService::new(links.clone(), cache.clone(), ranking, generator);

        Self {
            pipeline: Arc::new(pipeline),
            link_service: Arc::new(link_service),
            links,
            cache,
            behind_proxy,
        }
    }
}
