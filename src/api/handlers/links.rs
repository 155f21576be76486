//! Handlers for link management endpoints (create, list, read, delete).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkListResponse, LinkResponse};
use crate::api::dto::pagination::{PaginationParams, total_pages};
use crate::api::middleware::Owner;
use crate::application::services::CreateLink;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the calling owner.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "target_url": "https://example.com/landing",
///   "alias": "promo",                       // optional
///   "expires_at": "2030-01-01T00:00:00Z"    // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request for an invalid URL or alias (`validation_error`, `alias_too_long`)
/// - 409 Conflict if the alias is taken
/// - 503 Service Unavailable if no free code was found or the store is down
pub async fn create_link_handler(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(CreateLink {
            target_url: payload.target_url,
            alias: payload.alias,
            expires_at: payload.expires_at,
            owner_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&limit=20`
///
/// `page` starts at 1; `limit` defaults to 20 and must be within 1..=100.
/// A page past the end is empty, with `total` still reported.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Query(params): Query<PaginationParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (offset, limit) = params.validate_and_get_offset_limit().map_err(|message| {
        AppError::bad_request(message, json!({ "page": params.page, "limit": params.limit }))
    })?;

    let page = state.link_service.list_owned(owner_id, offset, limit).await?;

    Ok(Json(LinkListResponse {
        items: page.links.into_iter().map(LinkResponse::from).collect(),
        page: params.page(),
        limit: params.limit(),
        total: page.total,
        total_pages: total_pages(page.total, params.limit()),
    }))
}

/// Returns an owned link including its durable click counter.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// Links owned by someone else are reported as 404.
pub async fn link_info_handler(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_owned(&code, owner_id).await?;
    Ok(Json(link.into()))
}

/// Deletes an owned link and invalidates its cache entry.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Response Codes
///
/// - **204 No Content**: Link deleted
/// - **404 Not Found**: No such link for this owner
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.link_service.delete(&code, owner_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(code))
    }
}
