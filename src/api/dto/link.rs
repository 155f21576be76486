//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::Link;

/// Only plain web targets are redirected to.
static HTTP_SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Request to create a short link.
///
/// Alias rules (length, charset, uniqueness) are enforced by the code
/// generator so that each violation keeps its own error code.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The target URL (must be a valid HTTP/HTTPS URL).
    #[validate(url(message = "Invalid URL format"))]
    #[validate(regex(
        path = "*HTTP_SCHEME_REGEX",
        message = "Only http and https targets are supported"
    ))]
    pub target_url: String,

    /// Optional caller-chosen code.
    pub alias: Option<String>,

    /// Optional expiry timestamp. After this time, the link returns 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub target_url: String,
    pub is_alias: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            code: link.code,
            target_url: link.target_url,
            is_alias: link.is_alias,
            expires_at: link.expires_at,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

/// One page of the caller's links, newest first.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}
