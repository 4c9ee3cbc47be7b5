//! Project configuration store adapters.
//!
//! - `JsonConfigStore`: the project's JSON config file (production)
//! - `MemoryConfigStore`: in-process values (dry runs, tests)

pub mod json;
pub mod memory;

pub use json::{DEFAULT_FILE_NAME, DEFAULT_NAMESPACE, JsonConfigStore};
pub use memory::MemoryConfigStore;
