//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, Redis setup, click worker spawning, and the
//! Axum server lifecycle including graceful shutdown.

use crate::application::services::{ClickRecorder, CodeGenerator};
use crate::config::Config;
use crate::domain::click_worker::{ClickEffects, run_click_worker};
use crate::domain::repositories::{ClickLog, HotRanking, LinkStore};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache, connect_manager};
use crate::infrastructure::persistence::{PgClickLog, PgLinkStore};
use crate::infrastructure::ranking::{InMemoryHotRanking, RedisHotRanking};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::geo::open_geo_database;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache and hot ranking (or process-local fallbacks)
/// - GeoIP database, when `GEOIP_DB_PATH` is set
/// - Background click worker
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting requests, then the click
/// worker gets `SHUTDOWN_GRACE_SECONDS` to flush pending clicks.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let pool = Arc::new(pool);
    let links: Arc<dyn LinkStore> = Arc::new(PgLinkStore::new(pool.clone()));
    let clicks: Arc<dyn ClickLog> = Arc::new(PgClickLog::new(pool));

    let (cache, ranking) = connect_redis(&config).await;

    let geo = open_geo_database(config.geoip_db_path.as_deref());
    let (recorder, click_rx) = ClickRecorder::channel(config.click_queue_capacity, geo);
    let effects = Arc::new(ClickEffects::new(
        links.clone(),
        clicks,
        ranking.clone(),
        config.click_effect_retries,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        effects,
        config.worker_options(),
        shutdown_rx,
    ));

    let generator = CodeGenerator::new(links.clone(), config.code_length, config.code_max_attempts);
    let state = AppState::new(
        links,
        cache,
        ranking,
        recorder,
        generator,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("HTTP server stopped, flushing click queue");
    let _ = shutdown_tx.send(true);

    match worker.await {
        Ok(report) if report.dropped > 0 => {
            warn!(dropped = report.dropped, "Some clicks were not recorded")
        }
        Ok(_) => info!("All pending clicks recorded"),
        Err(e) => error!(error = %e, "Click worker panicked"),
    }

    Ok(())
}

/// Builds the PostgreSQL pool from the `DB_*` pool settings.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Connects the cache and hot ranking to Redis over one managed connection.
///
/// Falls back to [`NullCache`] and a process-local [`InMemoryHotRanking`]
/// when Redis is not configured or unreachable at startup.
async fn connect_redis(config: &Config) -> (Arc<dyn CacheService>, Arc<dyn HotRanking>) {
    let Some(redis_url) = &config.redis_url else {
        info!("Cache disabled (NullCache), hot ranking kept in memory");
        return (Arc::new(NullCache::new()), Arc::new(InMemoryHotRanking::new()));
    };

    match connect_manager(redis_url).await {
        Ok(conn) => {
            info!("Cache and hot ranking enabled (Redis)");
            (
                Arc::new(RedisCache::new(conn.clone(), config.cache_ttl_seconds)),
                Arc::new(RedisHotRanking::new(conn)),
            )
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Redis, using NullCache and in-memory hot ranking");
            (Arc::new(NullCache::new()), Arc::new(InMemoryHotRanking::new()))
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
