//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::extract_client_ip;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the client IP (proxy headers only when `BEHIND_PROXY` is set)
/// 2. Resolve the code through [`crate::application::services::RedirectPipeline`]
/// 3. Return `301 Moved Permanently` with a `Location` header
///
/// Click recording happens in the background and never delays the response.
///
/// # Errors
///
/// - 404 Not Found if the short code doesn't exist
/// - 410 Gone if the link has expired
/// - 503 Service Unavailable if the link store cannot be reached
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = extract_client_ip(&headers, addr, state.behind_proxy);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let referrer = headers.get(header::REFERER).and_then(|v| v.to_str().ok());

    let target = state
        .pipeline
        .resolve(&code, &client_ip, user_agent, referrer)
        .await?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]))
}
