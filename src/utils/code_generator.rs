//! Short code generation and alias validation utilities.

use crate::error::{AppError, MAX_ALIAS_LENGTH};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Default length of generated codes (~62^6 ≈ 5.7e10 combinations).
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Aliases that would shadow service routes.
const RESERVED_ALIASES: &[&str] = &["api", "health"];

/// Generates a random code of `length` characters drawn from `[A-Za-z0-9]`.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Validates a caller-supplied alias.
///
/// # Rules
///
/// - Length: at most [`MAX_ALIAS_LENGTH`] characters (checked first)
/// - Non-empty
/// - ASCII letters and digits only
/// - Not a reserved route name
///
/// # Errors
///
/// Returns [`AppError::AliasTooLong`] if the alias is longer than the limit,
/// and [`AppError::Validation`] for empty, non-alphanumeric or reserved aliases.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    let length = alias.chars().count();
    if length > MAX_ALIAS_LENGTH {
        return Err(AppError::AliasTooLong { length });
    }

    if alias.is_empty() {
        return Err(AppError::bad_request(
            "Alias must not be empty",
            json!({ "alias": alias }),
        ));
    }

    if !alias.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(
            "Alias can only contain letters and digits",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
