//! API route configuration.
//!
//! Link management routes identify the caller through the `X-Owner-Id`
//! header (see [`crate::api::middleware::Owner`]).

use crate::api::handlers::{
    create_link_handler, delete_link_handler, hot_handler, link_info_handler, list_links_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /links`          - Create a short link
/// - `GET    /links`          - List owned links (`?page=&limit=`, newest first)
/// - `GET    /links/{code}`   - Owned link info with click counter
/// - `DELETE /links/{code}`   - Delete an owned link
/// - `GET    /hot`            - Most clicked codes (`?limit=`, default 10, max 100)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route(
            "/links/{code}",
            get(link_info_handler).delete(delete_link_handler),
        )
        .route("/hot", get(hot_handler))
}
