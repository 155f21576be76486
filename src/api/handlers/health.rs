//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Link store and click queue healthy. A cache outage only
///   turns `status` into `"degraded"`, since lookups fall through to the store
/// - **503 Service Unavailable**: Link store or click queue failing (`"unhealthy"`)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "link_store": { "status": "ok", "message": "Connected" },
///     "click_queue": { "status": "ok", "message": "Queued: 3/10000" },
///     "cache": { "status": "ok", "message": "Connected" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (link_store, cache) = tokio::join!(check_link_store(&state), check_cache(&state));
    let click_queue = check_click_queue(&state);

    let serving = link_store.is_ok() && click_queue.is_ok();
    let status = match (serving, cache.is_ok()) {
        (false, _) => "unhealthy",
        (true, false) => "degraded",
        (true, true) => "healthy",
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            link_store,
            click_queue,
            cache,
        },
    };

    if serving {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_link_store(state: &AppState) -> CheckStatus {
    if state.links.health_check().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Link store unreachable")
    }
}

/// Checks if the click worker is still accepting clicks.
fn check_click_queue(state: &AppState) -> CheckStatus {
    let recorder = state.pipeline.recorder();

    if recorder.is_accepting() {
        CheckStatus::ok(format!(
            "Queued: {}/{}",
            recorder.queue_depth(),
            recorder.queue_capacity()
        ))
    } else {
        CheckStatus::error("Click queue is closed")
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::warning("Cache unreachable, reading from link store")
    }
}
