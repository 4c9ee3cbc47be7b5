//! Domain value objects: Dialect and Protocol.
//!
//! # Design
//!
//! These are pure value types: `Copy` and compared by value.
//! They hold NO engine knowledge. Identifier limits, case folding and URL
//! shapes live in `registry.rs`. This file's only job is to define the types,
//! their string representations, and their `FromStr` parsers.
//!
//! # Adding a New Dialect
//!
//! 1. Add the enum variant here (and to [`Dialect::ALL`])
//! 2. Add the `as_str` arm here
//! 3. Add a `DialectDef` entry in `registry.rs`, at the variant's index
//! 4. Token parsing picks the new entry up from the registry

use crate::domain::{error::DomainError, registry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Dialect ──────────────────────────────────────────────────────────────────

/// A database engine the generator can target.
///
/// The discriminant doubles as the index into
/// [`registry::DIALECT_REGISTRY`]; keep the two in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "mariadb")]
    MariaDb,
    #[serde(rename = "postgresql")]
    PostgreSql,
    #[serde(rename = "oracle")]
    Oracle,
    #[serde(rename = "mssql")]
    MsSql,
    #[serde(rename = "h2Disk")]
    H2Disk,
    #[serde(rename = "h2Memory")]
    H2Memory,
    #[serde(rename = "cassandra")]
    Cassandra,
    #[serde(rename = "mongodb")]
    MongoDb,
    #[serde(rename = "couchbase")]
    Couchbase,
    #[serde(rename = "neo4j")]
    Neo4j,
}

impl Dialect {
    /// Every dialect, in registry order.
    pub const ALL: [Dialect; 11] = [
        Self::MySql,
        Self::MariaDb,
        Self::PostgreSql,
        Self::Oracle,
        Self::MsSql,
        Self::H2Disk,
        Self::H2Memory,
        Self::Cassandra,
        Self::MongoDb,
        Self::Couchbase,
        Self::Neo4j,
    ];

    /// Canonical token, as written in project configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::PostgreSql => "postgresql",
            Self::Oracle => "oracle",
            Self::MsSql => "mssql",
            Self::H2Disk => "h2Disk",
            Self::H2Memory => "h2Memory",
            Self::Cassandra => "cassandra",
            Self::MongoDb => "mongodb",
            Self::Couchbase => "couchbase",
            Self::Neo4j => "neo4j",
        }
    }

    /// Registry entry for this dialect.
    pub fn def(self) -> &'static registry::DialectDef {
        registry::dialect_def(self)
    }

    /// Longest identifier the engine accepts.
    pub fn max_identifier_length(self) -> usize {
        self.def().max_identifier_length
    }

    /// Whether unquoted identifiers are case-insensitive (and therefore
    /// snake_cased by default).
    pub fn folds_case(self) -> bool {
        self.def().folds_case
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DomainError;

    /// Every token lookup funnels through the registry; an unknown token is
    /// the single "not found" path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        registry::find_dialect(s)
            .map(|def| def.dialect)
            .ok_or_else(|| DomainError::unsupported(s))
    }
}

// ── Protocol ─────────────────────────────────────────────────────────────────

/// Connection string family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Blocking JDBC driver URL (`jdbc:`).
    #[default]
    Jdbc,
    /// Reactive R2DBC driver URL (`r2dbc:`).
    R2dbc,
}

impl Protocol {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jdbc => "jdbc",
            Self::R2dbc => "r2dbc",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jdbc" => Ok(Self::Jdbc),
            "r2dbc" => Ok(Self::R2dbc),
            other => Err(DomainError::unsupported(format!("protocol {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_round_trips_through_its_token() {
        for dialect in Dialect::ALL {
            assert_eq!(Dialect::from_str(dialect.as_str()).unwrap(), dialect);
        }
    }

    #[test]
    fn dialect_parsing_is_case_insensitive() {
        assert_eq!(Dialect::from_str("PostgreSQL").unwrap(), Dialect::PostgreSql);
        assert_eq!(Dialect::from_str("h2disk").unwrap(), Dialect::H2Disk);
        assert_eq!(Dialect::from_str("postgres").unwrap(), Dialect::PostgreSql);
    }

    #[test]
    fn unknown_dialect_is_unsupported() {
        assert_eq!(
            Dialect::from_str("db2"),
            Err(DomainError::UnsupportedDialect {
                dialect: "db2".into()
            })
        );
    }

    #[test]
    fn protocol_parses() {
        assert_eq!(Protocol::from_str("R2DBC").unwrap(), Protocol::R2dbc);
        assert!(Protocol::from_str("odbc").is_err());
    }
}
