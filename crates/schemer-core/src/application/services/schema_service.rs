//! Schema Service - dialect-bound naming and connection strings.
//!
//! Binds the pure naming and URL rules to one target dialect and the
//! project's naming settings, and reports when a name had to be shortened.

use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    domain::{ConnectionOptions, Dialect, IdentifierKind, NamingRequest, Protocol, build_url},
    error::SchemerResult,
};

/// A generated identifier plus what it took to produce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedName {
    pub kind: IdentifierKind,
    pub dialect: Dialect,
    pub name: String,
    pub limit: usize,
    /// `true` when the name was cut down and tagged with a hash.
    pub shortened: bool,
}

/// Naming and URL operations for one dialect.
#[derive(Debug, Clone)]
pub struct SchemaService {
    dialect: Dialect,
    disable_snake_case: bool,
    table_prefix: String,
}

impl SchemaService {
    /// Create a service for `dialect` with default naming settings.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            disable_snake_case: false,
            table_prefix: String::new(),
        }
    }

    /// Create a service from a dialect token such as `postgres` or `h2disk`.
    ///
    /// # Errors
    ///
    /// `UnsupportedDialect` when the token matches no registry entry.
    pub fn for_dialect(token: &str) -> SchemerResult<Self> {
        Ok(Self::new(Dialect::from_str(token)?))
    }

    pub fn with_disable_snake_case(mut self, disable: bool) -> Self {
        self.disable_snake_case = disable;
        self
    }

    /// Prefix for entity tables whose name is a reserved word.
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Generate any identifier kind. `secondary` is only read by pair kinds.
    #[instrument(skip(self), fields(dialect = %self.dialect))]
    pub fn generate(
        &self,
        kind: IdentifierKind,
        primary: &str,
        secondary: Option<&str>,
    ) -> GeneratedName {
        let request = NamingRequest {
            primary,
            secondary,
            dialect: self.dialect,
            disable_snake_case: self.disable_snake_case,
        };

        let (name, full_name) = match kind {
            IdentifierKind::Table => (
                request.entity_table_name(&self.table_prefix),
                request.entity_table_full_name(&self.table_prefix),
            ),
            other => (request.generate(other), request.full_name(other)),
        };

        let limit = self.dialect.max_identifier_length();
        let shortened = full_name.len() > limit;
        if shortened {
            debug!(kind = kind.as_str(), %name, limit, "Identifier shortened to fit dialect");
        }

        GeneratedName {
            kind,
            dialect: self.dialect,
            name,
            limit,
            shortened,
        }
    }

    pub fn table_name(&self, entity: &str) -> String {
        self.generate(IdentifierKind::Table, entity, None).name
    }

    pub fn column_name(&self, field: &str) -> String {
        self.generate(IdentifierKind::Column, field, None).name
    }

    pub fn join_table_name(&self, entity: &str, relationship: &str) -> String {
        self.generate(IdentifierKind::JoinTable, entity, Some(relationship))
            .name
    }

    pub fn fk_constraint_name(&self, entity: &str, relationship: &str) -> String {
        self.generate(IdentifierKind::ForeignKey, entity, Some(relationship))
            .name
    }

    pub fn ux_constraint_name(&self, entity: &str, column: &str) -> String {
        self.generate(IdentifierKind::UniqueConstraint, entity, Some(column))
            .name
    }

    /// Connection string for this service's dialect.
    #[instrument(skip(self, options), fields(dialect = %self.dialect))]
    pub fn connection_url(
        &self,
        protocol: Protocol,
        options: &ConnectionOptions,
    ) -> SchemerResult<String> {
        let url = build_url(protocol, self.dialect, options)?;
        debug!(%url, "Connection URL built");
        Ok(url)
    }

    pub fn jdbc_url(&self, options: &ConnectionOptions) -> SchemerResult<String> {
        self.connection_url(Protocol::Jdbc, options)
    }

    pub fn r2dbc_url(&self, options: &ConnectionOptions) -> SchemerResult<String> {
        self.connection_url(Protocol::R2dbc, options)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
