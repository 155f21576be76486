//! Collision-safe short code generation.

use std::sync::Arc;

use tracing::debug;

use crate::domain::repositories::LinkStore;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code, validate_alias};

/// Default number of random draws before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Number of random codes a single creation may still try.
///
/// One budget is shared by the pre-insert uniqueness checks and the retries
/// after an insert-time conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget {
    max: usize,
    used: usize,
}

impl AttemptBudget {
    pub fn new(max: usize) -> Self {
        Self { max, used: 0 }
    }

    pub fn used(&self) -> usize {
        self.used
    }

    fn take(&mut self) -> bool {
        if self.used < self.max {
            self.used += 1;
            true
        } else {
            false
        }
    }
}

/// Produces unique short codes or validates caller-supplied aliases.
///
/// Uniqueness checks here are advisory; the link store's unique constraint is
/// authoritative and a conflict on insert is retried by
/// [`crate::application::services::LinkService`].
pub struct CodeGenerator {
    links: Arc<dyn LinkStore>,
    code_length: usize,
    max_attempts: usize,
}

impl CodeGenerator {
    pub fn new(links: Arc<dyn LinkStore>, code_length: usize, max_attempts: usize) -> Self {
        Self {
            links,
            code_length,
            max_attempts,
        }
    }

    /// Generator with the default code length and attempt budget.
    pub fn with_defaults(links: Arc<dyn LinkStore>) -> Self {
        Self::new(links, DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }

    /// A fresh attempt budget for one creation.
    pub fn budget(&self) -> AttemptBudget {
        AttemptBudget::new(self.max_attempts)
    }

    /// Returns a code that was free at the time of the check.
    ///
    /// # Errors
    ///
    /// - [`AppError::AliasTooLong`] - alias longer than the limit; the store is not consulted
    /// - [`AppError::Validation`] - empty or non-alphanumeric alias
    /// - [`AppError::AliasConflict`] - alias already taken
    /// - [`AppError::GenerationExhausted`] - every random draw collided
    pub async fn generate(&self, alias: Option<&str>) -> Result<String, AppError> {
        let mut budget = self.budget();
        self.generate_within(alias, &mut budget).await
    }

    /// Like [`Self::generate`], drawing random codes from an existing budget.
    pub async fn generate_within(
        &self,
        alias: Option<&str>,
        budget: &mut AttemptBudget,
    ) -> Result<String, AppError> {
        if let Some(alias) = alias {
            validate_alias(alias)?;

            if self.links.exists(alias).await? {
                return Err(AppError::alias_conflict(alias));
            }
            return Ok(alias.to_string());
        }

        while budget.take() {
            let code = generate_code(self.code_length);

            if !self.links.exists(&code).await? {
                return Ok(code);
            }
            debug!(code, attempt = budget.used(), "Generated code collided, redrawing");
        }

        Err(AppError::GenerationExhausted {
            attempts: budget.used(),
        })
    }
}
