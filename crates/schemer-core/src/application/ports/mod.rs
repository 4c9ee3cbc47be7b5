//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `schemer-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ConfigStore`: project configuration key/value access
//!   - `Clock`: current wall-clock time

pub mod output;

pub use output::{Clock, ConfigStore};
