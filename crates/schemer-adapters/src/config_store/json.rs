//! JSON project configuration store.
//!
//! Values live under one namespace object of a JSON file shared with other
//! tools:
//!
//! ```json
//! {
//!   "schemer": {
//!     "lastLiquibaseTimestamp": 1577836800000,
//!     "creationTimestamp": 1577836800000
//!   },
//!   "other-tool": { "...": "untouched" }
//! }
//! ```
//!
//! Every read goes to disk. Writes render the whole document into a sibling
//! temporary file and rename it over the target, so readers see either the
//! old file or the new one. Unknown keys and their order are kept.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use schemer_core::{
    application::{ApplicationError, ports::ConfigStore},
    error::{SchemerError, SchemerResult},
};

/// Namespace object the store reads and writes.
pub const DEFAULT_NAMESPACE: &str = "schemer";

/// File name looked up in the project root.
pub const DEFAULT_FILE_NAME: &str = ".schemer-rc.json";

/// [`ConfigStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
    namespace: String,
}

impl JsonConfigStore {
    /// Store at `path` using the default namespace.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            namespace: DEFAULT_NAMESPACE.into(),
        }
    }

    /// Store for the project rooted at `dir`.
    pub fn in_project(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The whole document; an empty object when the file does not exist.
    fn load(&self) -> SchemerResult<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.persistence_error("read", e)),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(self.persistence_error("parse", "top-level value is not an object")),
            Err(e) => Err(self.persistence_error("parse", e)),
        }
    }

    fn save(&self, document: &Map<String, Value>) -> SchemerResult<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)
                    .map_err(|e| self.persistence_error("create directory", e))?;
                parent
            }
            None => Path::new("."),
        };

        let mut rendered = serde_json::to_string_pretty(document)
            .map_err(|e| self.persistence_error("serialize", e))?;
        rendered.push('\n');

        // Dropping `staged` on any error below removes the temporary file.
        let mut staged =
            NamedTempFile::new_in(dir).map_err(|e| self.persistence_error("create temp file", e))?;
        staged
            .write_all(rendered.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| self.persistence_error("write", e))?;
        staged
            .persist(&self.path)
            .map_err(|e| self.persistence_error("replace", e.error))?;
        Ok(())
    }

    fn persistence_error(&self, operation: &str, e: impl std::fmt::Display) -> SchemerError {
        ApplicationError::Persistence {
            path: self.path.clone(),
            reason: format!("Failed to {}: {}", operation, e),
        }
        .into()
    }
}

impl ConfigStore for JsonConfigStore {
    fn get_i64(&self, key: &str) -> SchemerResult<Option<i64>> {
        let document = self.load()?;
        let Some(value) = document
            .get(&self.namespace)
            .and_then(Value::as_object)
            .and_then(|section| section.get(key))
        else {
            return Ok(None);
        };

        match value {
            Value::Null => Ok(None),
            other => other.as_i64().map(Some).ok_or_else(|| {
                ApplicationError::ConfigStore {
                    key: key.into(),
                    reason: format!("expected an integer, found {}", other),
                }
                .into()
            }),
        }
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn set_i64(&self, key: &str, value: i64) -> SchemerResult<()> {
        let mut document = self.load()?;

        let section = document
            .entry(self.namespace.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(section) = section else {
            return Err(self.persistence_error(
                "update",
                format!("'{}' is not an object", self.namespace),
            ));
        };
        section.insert(key.into(), Value::from(value));

        self.save(&document)?;
        debug!("Project configuration updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> JsonConfigStore {
        JsonConfigStore::in_project(temp.path())
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert_eq!(store.get_i64("lastLiquibaseTimestamp").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn set_then_get() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.set_i64("lastLiquibaseTimestamp", 1_577_836_800_000).unwrap();
        assert_eq!(
            store.get_i64("lastLiquibaseTimestamp").unwrap(),
            Some(1_577_836_800_000)
        );
    }

    #[test]
    fn writes_under_namespace() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.set_i64("creationTimestamp", 42).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["schemer"]["creationTimestamp"], 42);
        assert!(raw.ends_with('\n'));
    }

    #[test]
    fn preserves_unrelated_keys_and_order() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(
            store.path(),
            r#"{"zeta":{"keep":true},"schemer":{"baseName":"app"},"alpha":1}"#,
        )
        .unwrap();

        store.set_i64("lastLiquibaseTimestamp", 7).unwrap();

        let doc: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "schemer", "alpha"]);
        assert_eq!(doc["zeta"]["keep"], true);
        assert_eq!(doc["schemer"]["baseName"], "app");
        assert_eq!(doc["schemer"]["lastLiquibaseTimestamp"], 7);
    }

    #[test]
    fn custom_namespace_is_isolated() {
        let temp = TempDir::new().unwrap();
        let default = store_in(&temp);
        let other = store_in(&temp).with_namespace("generator-jhipster");

        default.set_i64("k", 1).unwrap();
        other.set_i64("k", 2).unwrap();

        assert_eq!(default.get_i64("k").unwrap(), Some(1));
        assert_eq!(other.get_i64("k").unwrap(), Some(2));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let temp = TempDir::new().unwrap();
        let store = JsonConfigStore::new(temp.path().join("nested/dir/config.json"));
        store.set_i64("k", 1).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn malformed_file_is_a_persistence_error() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.get_i64("k"),
            Err(SchemerError::Application(ApplicationError::Persistence { .. }))
        ));
        assert!(store.set_i64("k", 1).is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn writes_replace_the_file_instead_of_rewriting_it() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(store.path(), r#"{"schemer":{"k":1}}"#).unwrap();
        let previous = temp.path().join("previous.json");
        fs::hard_link(store.path(), &previous).unwrap();

        store.set_i64("k", 2).unwrap();

        // The old inode is never opened for writing, so a crash mid-write
        // cannot leave a half-written file at the target path.
        assert_eq!(fs::read_to_string(&previous).unwrap(), r#"{"schemer":{"k":1}}"#);
        assert_eq!(store.get_i64("k").unwrap(), Some(2));

        let mut names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, [DEFAULT_FILE_NAME, "previous.json"]);
    }

    #[test]
    fn failed_replace_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();
        let store = JsonConfigStore::new(&target);

        assert!(matches!(
            store.set_i64("k", 1),
            Err(SchemerError::Application(ApplicationError::Persistence { .. }))
        ));
        assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "x");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn non_integer_value_is_a_store_error() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(store.path(), r#"{"schemer":{"k":"soon"}}"#).unwrap();

        assert!(matches!(
            store.get_i64("k"),
            Err(SchemerError::Application(ApplicationError::ConfigStore { .. }))
        ));
    }

    #[test]
    fn non_object_namespace_is_rejected_on_write() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(store.path(), r#"{"schemer":[1,2,3]}"#).unwrap();

        assert_eq!(store.get_i64("k").unwrap(), None);
        assert!(store.set_i64("k", 1).is_err());
    }
}
