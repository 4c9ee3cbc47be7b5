//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SCHEMER__NAMING__DIALECT=oracle`
//! 3. `--config FILE` (must exist when given)
//! 4. `.schemer.toml` in the current directory
//! 5. `config.toml` in the platform config directory
//! 6. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::cli::global::OutputFormat;

/// File name of the per-directory configuration.
pub const LOCAL_CONFIG_FILE: &str = ".schemer.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SCHEMER";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Identifier naming defaults.
    pub naming: NamingConfig,
    /// Changelog timestamp settings.
    pub changelog: ChangelogConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Dialect token used when `--dialect` is not given.
    pub dialect: String,
    pub disable_snake_case: bool,
    /// Prefix for entity tables whose name is a reserved word.
    pub table_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    pub reproducible: bool,
    /// Project creation date; switches on reproducible allocation.
    pub creation_timestamp: Option<String>,
    /// JSON file holding the persisted counter, relative to the CWD.
    pub project_config: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: OutputFormat,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            dialect: "postgresql".into(),
            disable_snake_case: false,
            table_prefix: "app".into(),
        }
    }
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            reproducible: false,
            creation_timestamp: None,
            project_config: PathBuf::from(schemer_adapters::config_store::DEFAULT_FILE_NAME),
        }
    }
}

impl AppConfig {
    /// Load configuration by layering files and environment over defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; unlike the
    /// implicit locations it must exist.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path(), Path::new(LOCAL_CONFIG_FILE), config_file)
    }

    fn load_from(
        global: &Path,
        local: &Path,
        explicit: Option<&PathBuf>,
    ) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::new(&global.to_string_lossy(), FileFormat::Toml).required(false))
            .add_source(File::new(&local.to_string_lossy(), FileFormat::Toml).required(false));

        if let Some(path) = explicit {
            builder =
                builder.add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(true));
        }

        let merged = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        merged
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.schemer.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "schemer", "schemer")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn load_with(files: &[(&str, &str)], explicit: Option<&str>) -> anyhow::Result<AppConfig> {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp.path().join(name), content).unwrap();
        }
        let explicit = explicit.map(|name| temp.path().join(name));
        AppConfig::load_from(
            &temp.path().join("global.toml"),
            &temp.path().join("local.toml"),
            explicit.as_ref(),
        )
    }

    #[test]
    fn defaults_without_files() {
        let cfg = load_with(&[], None).unwrap();
        assert_eq!(cfg.naming.dialect, "postgresql");
        assert_eq!(cfg.naming.table_prefix, "app");
        assert!(!cfg.changelog.reproducible);
        assert_eq!(cfg.changelog.project_config, PathBuf::from(".schemer-rc.json"));
        assert_eq!(cfg.output.format, OutputFormat::Auto);
    }

    #[test]
    fn local_file_overrides_global() {
        let cfg = load_with(
            &[
                ("global.toml", "[naming]\ndialect = \"mysql\"\ntable_prefix = \"jhi\"\n"),
                ("local.toml", "[naming]\ndialect = \"oracle\"\n"),
            ],
            None,
        )
        .unwrap();
        assert_eq!(cfg.naming.dialect, "oracle");
        assert_eq!(cfg.naming.table_prefix, "jhi");
    }

    #[test]
    fn explicit_file_wins_over_implicit_ones() {
        let cfg = load_with(
            &[
                ("local.toml", "[changelog]\nreproducible = false\n"),
                (
                    "custom.conf",
                    "[changelog]\nreproducible = true\ncreation_timestamp = \"2020-01-01\"\n",
                ),
            ],
            Some("custom.conf"),
        )
        .unwrap();
        assert!(cfg.changelog.reproducible);
        assert_eq!(cfg.changelog.creation_timestamp.as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(load_with(&[], Some("nope.toml")).is_err());
    }

    #[test]
    fn invalid_values_are_reported() {
        let result = load_with(&[("local.toml", "[output]\nformat = \"yaml\"\n")], None);
        assert!(result.is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let rendered = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
