// ============================================================================
// domain/error.rs - INPUT VALIDATION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is a deterministic input-validation failure. None of them
/// is retryable: calling again with the same input fails the same way.
///
/// All errors are:
/// - Cloneable
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("unsupported dialect '{dialect}'")]
    UnsupportedDialect { dialect: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("{}", missing_option_message(option, dialect.as_deref()))]
    MissingRequiredOption {
        option: &'static str,
        dialect: Option<String>,
    },

    #[error("creation timestamp {timestamp} is in the future (now: {now})")]
    FutureBaseTimestamp { timestamp: String, now: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

fn missing_option_message(option: &str, dialect: Option<&str>) -> String {
    match dialect {
        Some(dialect) => format!("option '{option}' is required for dialect '{dialect}'"),
        None => format!("option '{option}' is required"),
    }
}

impl DomainError {
    /// Shorthand for an [`DomainError::UnsupportedDialect`] naming `dialect`.
    pub fn unsupported(dialect: impl Into<String>) -> Self {
        Self::UnsupportedDialect {
            dialect: dialect.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnsupportedDialect { dialect } => vec![
                format!("'{}' is not a known database dialect", dialect),
                "SQL dialects: mysql, mariadb, postgresql, oracle, mssql, h2Disk, h2Memory".into(),
                "Connection URLs are only available for SQL dialects".into(),
            ],
            Self::MissingRequiredOption {
                option,
                dialect: Some(dialect),
            } => vec![
                format!("'{}' needs the '{}' option", dialect, option),
                "Embedded on-disk databases store their files under a local directory".into(),
            ],
            Self::MissingRequiredOption {
                option,
                dialect: None,
            } => vec![format!("Provide a value for '{}'", option)],
            Self::FutureBaseTimestamp { now, .. } => vec![
                "The creation timestamp must not be later than the current time".into(),
                format!("Use a date on or before {}", now),
            ],
            Self::InvalidTimestamp { .. } => vec![
                "Accepted formats: YYYY-MM-DD, RFC 3339, or YYYYMMDDHHmmss".into(),
                "Example: --base 2020-01-01".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedDialect { .. } => ErrorCategory::NotFound,
            Self::MissingRequiredOption { .. } | Self::InvalidTimestamp { .. } => {
                ErrorCategory::Validation
            }
            Self::FutureBaseTimestamp { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_option_names_dialect_when_known() {
        let err = DomainError::MissingRequiredOption {
            option: "localDirectory",
            dialect: Some("h2Disk".into()),
        };
        assert_eq!(
            err.to_string(),
            "option 'localDirectory' is required for dialect 'h2Disk'"
        );
    }

    #[test]
    fn missing_option_without_dialect() {
        let err = DomainError::MissingRequiredOption {
            option: "databaseName",
            dialect: None,
        };
        assert_eq!(err.to_string(), "option 'databaseName' is required");
    }

    #[test]
    fn unsupported_dialect_names_the_token() {
        let err = DomainError::unsupported("db2");
        assert!(err.to_string().contains("db2"));
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());
    }
}
