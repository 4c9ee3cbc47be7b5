// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Schemer.
//!
//! Pure functions and value types: no I/O, no clocks, no logging. Anything
//! stateful (the persisted changelog counter) lives in the application layer
//! behind ports.
//!
//! - [`registry`]: static per-engine constraints
//! - [`naming`]: identifier shortener
//! - [`connection`]: JDBC/R2DBC URL builder
//! - [`timestamp`]: 14-digit changelog keys
//!
// Public API - what the world sees
pub mod connection;
pub mod error;
pub mod naming;
pub mod registry;
pub mod timestamp;
pub mod value_objects;

// Re-exports for convenience
pub use connection::{ConnectionOptions, build_url, jdbc_url, r2dbc_url};
pub use error::{DomainError, ErrorCategory};
pub use naming::{
    IdentifierKind, NamingRequest, column_name, fk_constraint_name, join_table_name, snake_case,
    table_name, ux_constraint_name,
};
pub use registry::{DialectDef, find_dialect};
pub use timestamp::{ChangelogTimestamp, parse_base_timestamp};
pub use value_objects::{Dialect, Protocol};
