//! Application layer errors.
//!
//! These errors represent failures in orchestration and infrastructure, not
//! input validation. Validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while reading or writing through ports.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A configuration store could not read or write a key.
    #[error("Config store error for '{key}': {reason}")]
    ConfigStore { key: String, reason: String },

    /// Store access failed (lock poisoned).
    #[error("Config store lock poisoned")]
    StoreLockError,

    /// The project configuration file could not be loaded or saved.
    #[error("Project configuration error at {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigStore { key, .. } => vec![
                format!("Could not access '{}' in the project configuration", key),
                "Check that the stored value is a number of milliseconds".into(),
            ],
            Self::StoreLockError => vec![
                "The configuration store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::Persistence { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that the file is valid JSON".into(),
                "Check that you have write permissions".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigStore { .. } => ErrorCategory::Configuration,
            Self::StoreLockError => ErrorCategory::Internal,
            Self::Persistence { .. } => ErrorCategory::Configuration,
        }
    }
}
