#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo, routing::get};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use linkpulse::api::handlers::{health_handler, redirect_handler};
use linkpulse::api::routes::api_routes;
use linkpulse::application::services::{ClickRecorder, CodeGenerator};
use linkpulse::domain::click_worker::{ClickEffects, WorkerOptions, WorkerReport, run_click_worker};
use linkpulse::domain::entities::{Link, LinkSnapshot, NewLink};
use linkpulse::domain::repositories::LinkStore;
use linkpulse::error::AppError;
use linkpulse::infrastructure::cache::{CacheError, CacheResult, CacheService};
use linkpulse::infrastructure::persistence::{InMemoryClickLog, InMemoryLinkStore};
use linkpulse::infrastructure::ranking::InMemoryHotRanking;
use linkpulse::state::AppState;
use linkpulse::utils::geo::GeoLocation;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::Layer;

pub const OWNER_ID: i64 = 1;
pub const CLIENT_IP: &str = "8.8.8.8";
pub const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

/// Cache fake that behaves like a healthy Redis.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, LinkSnapshot>,
}

impl MemoryCache {
    pub fn put(&self, code: &str, snapshot: LinkSnapshot) {
        self.entries.insert(code.to_string(), snapshot);
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_link(&self, code: &str) -> CacheResult<Option<LinkSnapshot>> {
        Ok(self.entries.get(code).map(|e| e.value().clone()))
    }

    async fn set_link(
        &self,
        code: &str,
        snapshot: &LinkSnapshot,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.put(code, snapshot.clone());
        Ok(())
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        self.entries.remove(code);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Cache fake whose every operation fails.
pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn get_link(&self, _code: &str) -> CacheResult<Option<LinkSnapshot>> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn set_link(
        &self,
        _code: &str,
        _snapshot: &LinkSnapshot,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn invalidate(&self, _code: &str) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

fn fixed_geo(ip: IpAddr) -> Option<GeoLocation> {
    (ip.to_string() == CLIENT_IP).then(|| GeoLocation::new("US", "Mountain View"))
}

/// In-memory service with a running click worker.
pub struct TestApp {
    pub state: AppState,
    pub links: Arc<InMemoryLinkStore>,
    pub clicks: Arc<InMemoryClickLog>,
    pub ranking: Arc<InMemoryHotRanking>,
    shutdown: watch::Sender<bool>,
    worker: JoinHandle<WorkerReport>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(MemoryCache::default()))
    }

    pub fn with_cache(cache: Arc<dyn CacheService>) -> Self {
        Self::build(cache, 1024)
    }

    pub fn build(cache: Arc<dyn CacheService>, queue_capacity: usize) -> Self {
        let links = Arc::new(InMemoryLinkStore::new());
        let clicks = Arc::new(InMemoryClickLog::new());
        let ranking = Arc::new(InMemoryHotRanking::new());

        let (recorder, rx) = ClickRecorder::channel(queue_capacity, Arc::new(fixed_geo));
        let effects = Arc::new(ClickEffects::new(
            links.clone(),
            clicks.clone(),
            ranking.clone(),
            0,
        ));
        let options = WorkerOptions {
            concurrency: 4,
            effect_retries: 0,
            shutdown_grace: Duration::from_secs(5),
        };
        let (shutdown, shutdown_rx) = watch::channel(false);
        let worker = tokio::spawn(run_click_worker(rx, effects, options, shutdown_rx));

        let generator = CodeGenerator::with_defaults(links.clone());
        let state = AppState::new(
            links.clone(),
            cache,
            ranking.clone(),
            recorder,
            generator,
            false,
        );

        Self {
            state,
            links,
            clicks,
            ranking,
            shutdown,
            worker,
        }
    }

    /// Inserts a link directly into the store, bypassing code generation.
    pub async fn seed_link(
        &self,
        code: &str,
        target_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Link {
        self.links
            .insert_unique(NewLink {
                code: code.to_string(),
                target_url: target_url.to_string(),
                is_alias: true,
                expires_at,
                owner_id: OWNER_ID,
            })
            .await
            .unwrap()
    }

    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        self.state
            .pipeline
            .resolve(code, CLIENT_IP, Some(IPHONE_UA), None)
            .await
    }

    pub async fn click_count(&self, code: &str) -> i64 {
        self.links
            .get_by_code(code)
            .await
            .unwrap()
            .map(|l| l.click_count)
            .unwrap_or(0)
    }

    /// Stops the worker and waits until queued clicks are applied.
    pub async fn drain(&mut self) -> WorkerReport {
        let _ = self.shutdown.send(true);
        (&mut self.worker).await.unwrap()
    }

    /// Router with the public routes and a fixed peer address.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/{code}", get(redirect_handler))
            .nest("/api", api_routes())
            .layer(MockConnectInfoLayer)
            .with_state(self.state.clone())
    }
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = format!("{CLIENT_IP}:12345").parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
