//! Owner identification for link management endpoints.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde_json::json;

use crate::error::AppError;

/// Header carrying the authenticated principal id.
pub const OWNER_HEADER: &str = "x-owner-id";

/// The principal a link management request acts for.
///
/// Authentication happens upstream; the gateway sets `X-Owner-Id` to the
/// verified principal id and this extractor only parses it.
///
/// # Errors
///
/// Rejects with `400 Bad Request` if the header is missing or not a positive integer.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Owner(owner_id): Owner) -> String {
///     format!("acting for {owner_id}")
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub i64);

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim);

        match raw.and_then(|v| v.parse::<i64>().ok()) {
            Some(id) if id > 0 => Ok(Owner(id)),
            _ => Err(AppError::bad_request(
                "Missing or invalid X-Owner-Id header",
                json!({ "header": "X-Owner-Id" }),
            )),
        }
    }
}
