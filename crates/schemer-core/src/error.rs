//! Unified error handling for Schemer Core.
//!
//! Wraps domain and application errors in one root type, each carrying
//! user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Schemer Core operations.
#[derive(Debug, Error, Clone)]
pub enum SchemerError {
    /// Invalid input to a naming, URL or timestamp rule.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Port failures (persisted configuration, locks).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),
}

impl SchemerError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type SchemerResult<T> = Result<T, SchemerError>;
