//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `schemer-adapters` crate provides implementations.

use chrono::{DateTime, Utc};

use crate::error::SchemerResult;

/// Port for the project's persisted configuration.
///
/// Implemented by:
/// - `schemer_adapters::config_store::JsonConfigStore` (production)
/// - `schemer_adapters::config_store::MemoryConfigStore` (testing)
///
/// ## Design Notes
///
/// - Values are plain integers (epoch milliseconds for timestamps)
/// - Read-modify-write is not atomic; one writer per project is assumed
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore: Send + Sync {
    /// Read an integer value. `None` when the key has never been set.
    fn get_i64(&self, key: &str) -> SchemerResult<Option<i64>>;

    /// Write an integer value, replacing any previous one.
    fn set_i64(&self, key: &str, value: i64) -> SchemerResult<()>;
}

/// Port for the current time.
///
/// Implemented by:
/// - `schemer_adapters::clock::SystemClock` (production)
/// - `schemer_adapters::clock::FixedClock` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
