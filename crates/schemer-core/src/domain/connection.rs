//! Connection URL builder.
//!
//! Turns a dialect plus a handful of [`ConnectionOptions`] into the JDBC or
//! R2DBC string embedded in generated environment profiles. All URL shapes
//! come from the dialect registry; this module only assembles them.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    registry::{UrlShape, UrlTemplate},
    value_objects::{Dialect, Protocol},
};

/// Host used when the caller does not name one.
pub const DEFAULT_HOSTNAME: &str = "localhost";

/// Inputs to [`build_url`].
///
/// `database_name` is required for every dialect; `local_directory` only for
/// on-disk embedded engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionOptions {
    pub database_name: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub local_directory: Option<String>,
    pub skip_extra_options: bool,
    /// Production dialect an embedded engine should emulate.
    pub prod_database_type: Option<Dialect>,
}

impl ConnectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = Some(name.into());
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn local_directory(mut self, dir: impl Into<String>) -> Self {
        self.local_directory = Some(dir.into());
        self
    }

    pub fn skip_extra_options(mut self, skip: bool) -> Self {
        self.skip_extra_options = skip;
        self
    }

    pub fn prod_database_type(mut self, dialect: Dialect) -> Self {
        self.prod_database_type = Some(dialect);
        self
    }
}

/// `jdbc:` URL for `dialect`.
pub fn jdbc_url(dialect: Dialect, options: &ConnectionOptions) -> Result<String, DomainError> {
    build_url(Protocol::Jdbc, dialect, options)
}

/// `r2dbc:` URL for `dialect`.
pub fn r2dbc_url(dialect: Dialect, options: &ConnectionOptions) -> Result<String, DomainError> {
    build_url(Protocol::R2dbc, dialect, options)
}

/// Assemble a connection string.
///
/// # Errors
///
/// - `MissingRequiredOption` when `database_name` is absent or blank (checked
///   first, whatever the dialect), or when an on-disk engine has no
///   `local_directory`.
/// - `UnsupportedDialect` when the dialect has no driver (NoSQL engines).
pub fn build_url(
    protocol: Protocol,
    dialect: Dialect,
    options: &ConnectionOptions,
) -> Result<String, DomainError> {
    let database = options
        .database_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or(DomainError::MissingRequiredOption {
            option: "databaseName",
            dialect: None,
        })?;

    let connection = dialect
        .def()
        .connection
        .ok_or_else(|| DomainError::unsupported(dialect.as_str()))?;

    let template = match protocol {
        Protocol::Jdbc => connection.jdbc,
        Protocol::R2dbc => connection.r2dbc,
    };

    let mut url = format!("{protocol}:{}", template.scheme);
    url.push_str(&location(&template, dialect, database, options)?);

    if !options.skip_extra_options {
        url.push_str(template.extra_options);
    }

    if let Some(mode) = compatibility_mode(&template, options.prod_database_type) {
        url.push_str(mode.0);
        url.push_str(mode.1);
    }

    Ok(url)
}

fn location(
    template: &UrlTemplate,
    dialect: Dialect,
    database: &str,
    options: &ConnectionOptions,
) -> Result<String, DomainError> {
    match template.shape {
        UrlShape::Network {
            default_port,
            database_separator,
        } => {
            let host = options.hostname.as_deref().unwrap_or(DEFAULT_HOSTNAME);
            let port = options.port.unwrap_or(default_port);
            Ok(format!("{host}:{port}{database_separator}{database}"))
        }
        UrlShape::File => {
            let dir = options
                .local_directory
                .as_deref()
                .filter(|dir| !dir.trim().is_empty())
                .ok_or_else(|| DomainError::MissingRequiredOption {
                    option: "localDirectory",
                    dialect: Some(dialect.as_str().to_owned()),
                })?;
            Ok(format!("{}/{database}", dir.trim_end_matches('/')))
        }
        UrlShape::Memory => Ok(database.to_owned()),
    }
}

/// `(parameter, mode)` when the target can emulate `prod`.
fn compatibility_mode(
    template: &UrlTemplate,
    prod: Option<Dialect>,
) -> Option<(&'static str, &'static str)> {
    let parameter = template.mode_parameter?;
    let mode = prod?.def().connection?.compatibility_mode?;
    Some((parameter, mode))
}

// ── tests ─────────────────────────────────────────────────────────────────────
