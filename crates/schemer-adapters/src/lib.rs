//! Infrastructure adapters for Schemer.
//!
//! This crate implements the ports defined in `schemer-core::application::ports`.
//! It contains all file I/O and wall-clock access.

pub mod clock;
pub mod config_store;

// Re-export commonly used adapters
pub use clock::{FixedClock, SystemClock};
pub use config_store::{JsonConfigStore, MemoryConfigStore};
