//! Click entity representing a single recorded redirect.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A click event appended to the click log when a short link resolves.
///
/// Geo and device fields are already classified; the log stores them as-is
/// so aggregation reports can group directly over them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewClick {
    pub code: String,
    pub ip: String,
    pub country: String,
    pub city: String,
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub referrer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}
