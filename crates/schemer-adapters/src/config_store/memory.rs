//! In-memory configuration store.
//!
//! Used for dry runs and tests. Clones share the same values.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use schemer_core::{
    application::{ApplicationError, ports::ConfigStore},
    error::SchemerResult,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    inner: Arc<RwLock<HashMap<String, i64>>>,
}

impl MemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `keys` from another store. Absent keys stay absent.
    pub fn snapshot_of(source: &dyn ConfigStore, keys: &[&str]) -> SchemerResult<Self> {
        let store = Self::new();
        for key in keys {
            if let Some(value) = source.get_i64(key)? {
                store.set_i64(key, value)?;
            }
        }
        Ok(store)
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get_i64(&self, key: &str) -> SchemerResult<Option<i64>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(key).copied())
    }

    fn set_i64(&self, key: &str, value: i64) -> SchemerResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(key.to_string(), value);
        Ok(())
    }
}
