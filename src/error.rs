//! Application error taxonomy and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Maximum length of a caller-chosen alias.
pub const MAX_ALIAS_LENGTH: usize = 20;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned by the HTTP adapter.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced by the resolution and link-management pipeline.
///
/// Cache failures never appear here; they are handled fail-open at the cache
/// boundary (see [`crate::infrastructure::cache::CacheError`]).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("short link not found: {code}")]
    NotFound { code: String },

    #[error("short link has expired: {code}")]
    Expired { code: String },

    #[error("alias cannot exceed {max} characters (got {length})", max = MAX_ALIAS_LENGTH)]
    AliasTooLong { length: usize },

    #[error("alias is already taken: {code}")]
    AliasConflict { code: String },

    #[error("failed to generate a unique code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("link store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AppError {
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn expired(code: impl Into<String>) -> Self {
        Self::Expired { code: code.into() }
    }

    pub fn alias_conflict(code: impl Into<String>) -> Self {
        Self::AliasConflict { code: code.into() }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Expired { .. } => (StatusCode::GONE, "expired"),
            AppError::AliasTooLong { .. } => (StatusCode::BAD_REQUEST, "alias_too_long"),
            AppError::AliasConflict { .. } => (StatusCode::CONFLICT, "alias_conflict"),
            AppError::GenerationExhausted { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_exhausted")
            }
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
        }
    }

    /// Builds the JSON error payload for this error.
    ///
    /// Store failures are reported without the underlying driver message.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let (message, details) = match self {
            AppError::NotFound { code } | AppError::Expired { code } => {
                (self.to_string(), json!({ "code": code }))
            }
            AppError::AliasConflict { code } => (self.to_string(), json!({ "alias": code })),
            AppError::AliasTooLong { length } => (
                self.to_string(),
                json!({ "provided_length": length, "max_length": MAX_ALIAS_LENGTH }),
            ),
            AppError::GenerationExhausted { attempts } => {
                (self.to_string(), json!({ "attempts": attempts }))
            }
            AppError::Validation { message, details } => (message.clone(), details.clone()),
            AppError::StoreUnavailable(_) => ("Link store unavailable".to_string(), json!({})),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();
        if let AppError::StoreUnavailable(reason) = &self {
            tracing::error!(%reason, "Request failed: link store unavailable");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

/// Every driver error is a store failure. Unique violations are mapped to
/// [`AppError::AliasConflict`] by the insert that knows which code collided.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Request validation failed", json!(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::not_found("abc").status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::expired("abc").status_and_code().0, StatusCode::GONE);
        assert_eq!(
            AppError::AliasTooLong { length: 21 }.status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::alias_conflict("promo").status_and_code().0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::GenerationExhausted { attempts: 10 }
                .status_and_code()
                .0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::StoreUnavailable("down".into()).status_and_code().0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_store_unavailable_hides_driver_message() {
        let info = AppError::StoreUnavailable("password authentication failed".into())
            .to_error_info();

        assert_eq!(info.code, "store_unavailable");
        assert!(!info.message.contains("password"));
    }

    #[test]
    fn test_alias_too_long_details() {
        let info = AppError::AliasTooLong { length: 25 }.to_error_info();

        assert_eq!(info.details["provided_length"], 25);
        assert_eq!(info.details["max_length"], MAX_ALIAS_LENGTH);
    }
}
