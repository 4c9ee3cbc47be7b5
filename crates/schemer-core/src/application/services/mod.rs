//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "name a foreign key for Oracle" or "allocate
//! the next changelog timestamp".

pub mod schema_service;
pub mod timestamp_allocator;

pub use schema_service::{GeneratedName, SchemaService};
pub use timestamp_allocator::{
    AllocatorOptions, CREATION_TIMESTAMP, LAST_LIQUIBASE_TIMESTAMP, TimestampAllocator,
};
