//! Handler for the hot ranking endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use validator::Validate;

use crate::api::dto::hot::{HotQuery, HotResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists the most clicked codes.
///
/// # Endpoint
///
/// `GET /api/hot?limit=10`
///
/// `limit` defaults to 10 and must be within 1..=100.
pub async fn hot_handler(
    State(state): State<AppState>,
    Query(query): Query<HotQuery>,
) -> Result<Json<HotResponse>, AppError> {
    query.validate()?;

    let items = state.link_service.hot(query.limit()).await?;
    Ok(Json(HotResponse { items }))
}
