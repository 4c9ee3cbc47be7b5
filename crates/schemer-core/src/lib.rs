//! Schemer Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Schemer, the
//! database schema toolkit behind the entity scaffolder: identifier naming
//! per dialect, JDBC/R2DBC connection strings and persisted changelog
//! timestamps.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           schemer-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (SchemaService, TimestampAllocator)    │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │        (Driven: ConfigStore, Clock)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   schemer-adapters (Infrastructure)     │
//! │  (JsonConfigStore, SystemClock, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Dialect registry, naming, URLs)       │
//! │         No I/O, no clock                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use schemer_core::domain::{Dialect, fk_constraint_name};
//!
//! let name = fk_constraint_name("entityName", "relationshipName", Dialect::PostgreSql);
//! assert_eq!(name, "fk_entity_name__relationship_name_id");
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        AllocatorOptions, GeneratedName, SchemaService, TimestampAllocator,
        ports::{Clock, ConfigStore},
    };
    pub use crate::domain::{
        ChangelogTimestamp, ConnectionOptions, Dialect, IdentifierKind, NamingRequest, Protocol,
    };
    pub use crate::error::{SchemerError, SchemerResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
