//! Application layer for Schemer.
//!
//! This layer contains:
//! - **Services**: `TimestampAllocator` (stateful, persisted) and
//!   `SchemaService` (dialect-bound facade over the naming and URL rules)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer and owns all logging;
//! naming and URL rules themselves live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    AllocatorOptions, CREATION_TIMESTAMP, GeneratedName, LAST_LIQUIBASE_TIMESTAMP, SchemaService,
    TimestampAllocator,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Clock, ConfigStore};

pub use error::ApplicationError;
