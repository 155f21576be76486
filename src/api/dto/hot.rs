//! DTOs for the hot ranking endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::repositories::HotScore;

pub const DEFAULT_HOT_LIMIT: usize = 10;

/// Query parameters for `GET /api/hot`.
#[derive(Debug, Deserialize, Validate)]
pub struct HotQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

impl HotQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_HOT_LIMIT)
    }
}

/// Most clicked codes, highest score first.
#[derive(Debug, Serialize)]
pub struct HotResponse {
    pub items: Vec<HotScore>,
}
