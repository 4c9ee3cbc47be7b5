//! Dialect registry.
//!
//! Every engine is described exactly once by its [`DialectDef`]: identifier
//! length limit, case folding, accepted tokens and connection URL shapes.
//! Nothing in here is mutable; consumers look entries up and read them.
//!
//! # Adding a New Dialect
//!
//! 1. Add a variant to `Dialect` in `value_objects.rs`
//! 2. Add one [`DialectDef`] entry to [`DIALECT_REGISTRY`] at the same index
//! 3. Parsing, naming and URL building pick the entry up from there

use crate::domain::value_objects::Dialect;

// ── URL shapes ───────────────────────────────────────────────────────────────

/// How the part after the scheme is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlShape {
    /// `host:port<database_separator>database`
    Network {
        default_port: u16,
        database_separator: &'static str,
    },
    /// `<local directory>/<database>`
    File,
    /// `<database>`
    Memory,
}

/// One protocol's connection string template for a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlTemplate {
    /// Everything between `jdbc:`/`r2dbc:` and the location.
    pub scheme: &'static str,

    pub shape: UrlShape,

    /// Engine-tuning parameters (encoding, SSL, timezone...). Dropped when
    /// the caller asks to skip extra options.
    pub extra_options: &'static str,

    /// Parameter prefix used to request a compatibility mode, for engines
    /// that can emulate another dialect.
    pub mode_parameter: Option<&'static str>,
}

/// JDBC and R2DBC templates for a SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionDef {
    pub jdbc: UrlTemplate,
    pub r2dbc: UrlTemplate,

    /// Name an embedded engine uses for this dialect's compatibility mode.
    pub compatibility_mode: Option<&'static str>,
}

// ── Dialect definitions ──────────────────────────────────────────────────────

/// Describes everything the core needs to know about one database engine.
#[derive(Debug, Clone, Copy)]
pub struct DialectDef {
    /// The dialect this entry describes.
    pub dialect: Dialect,

    /// Lower-cased tokens accepted when parsing. The first one is the
    /// canonical token lower-cased.
    pub tokens: &'static [&'static str],

    /// Longest identifier (table, column, constraint) the engine accepts.
    pub max_identifier_length: usize,

    /// Whether unquoted identifiers are case-insensitive and snake_cased by
    /// default.
    pub folds_case: bool,

    /// `None` for engines without a JDBC/R2DBC driver.
    pub connection: Option<ConnectionDef>,
}

const MYSQL_OPTIONS: &str = "?useUnicode=true&characterEncoding=utf8&useSSL=false\
&useLegacyDatetimeCode=false&serverTimezone=UTC&createDatabaseIfNotExist=true";
const MARIADB_OPTIONS: &str = "?useLegacyDatetimeCode=false&serverTimezone=UTC";
const H2_OPTIONS: &str = ";DB_CLOSE_DELAY=-1";

const fn network(
    scheme: &'static str,
    default_port: u16,
    database_separator: &'static str,
    extra_options: &'static str,
) -> UrlTemplate {
    UrlTemplate {
        scheme,
        shape: UrlShape::Network {
            default_port,
            database_separator,
        },
        extra_options,
        mode_parameter: None,
    }
}

const fn embedded(scheme: &'static str, shape: UrlShape) -> UrlTemplate {
    UrlTemplate {
        scheme,
        shape,
        extra_options: H2_OPTIONS,
        mode_parameter: Some(";MODE="),
    }
}

/// Single source of truth for dialect capabilities.
///
/// Indexed by `Dialect as usize`; `registry_is_indexed_by_dialect` guards
/// the ordering.
pub static DIALECT_REGISTRY: &[DialectDef] = &[
    DialectDef {
        dialect: Dialect::MySql,
        tokens: &["mysql"],
        max_identifier_length: 64,
        folds_case: true,
        connection: Some(ConnectionDef {
            jdbc: network("mysql://", 3306, "/", MYSQL_OPTIONS),
            r2dbc: network("mysql://", 3306, "/", MYSQL_OPTIONS),
            compatibility_mode: Some("MYSQL"),
        }),
    },
    DialectDef {
        dialect: Dialect::MariaDb,
        tokens: &["mariadb"],
        max_identifier_length: 64,
        folds_case: true,
        connection: Some(ConnectionDef {
            jdbc: network("mariadb://", 3306, "/", MARIADB_OPTIONS),
            r2dbc: network("mariadb://", 3306, "/", MARIADB_OPTIONS),
            compatibility_mode: Some("MARIADB"),
        }),
    },
    DialectDef {
        dialect: Dialect::PostgreSql,
        tokens: &["postgresql", "postgres"],
        max_identifier_length: 63,
        folds_case: true,
        connection: Some(ConnectionDef {
            jdbc: network("postgresql://", 5432, "/", ""),
            r2dbc: network("postgresql://", 5432, "/", ""),
            compatibility_mode: Some("POSTGRESQL"),
        }),
    },
    DialectDef {
        dialect: Dialect::Oracle,
        tokens: &["oracle"],
        // Legacy (pre-12.2) limit; generated names must stay portable.
        max_identifier_length: 30,
        folds_case: true,
        connection: Some(ConnectionDef {
            jdbc: network("oracle:thin:@", 1521, ":", ""),
            r2dbc: network("oracle://", 1521, "/", ""),
            compatibility_mode: Some("ORACLE"),
        }),
    },
    DialectDef {
        dialect: Dialect::MsSql,
        tokens: &["mssql", "sqlserver"],
        max_identifier_length: 128,
        folds_case: true,
        connection: Some(ConnectionDef {
            jdbc: network("sqlserver://", 1433, ";database=", ";encrypt=false"),
            r2dbc: network("mssql://", 1433, "/", ""),
            compatibility_mode: Some("MSSQLSERVER"),
        }),
    },
    DialectDef {
        dialect: Dialect::H2Disk,
        tokens: &["h2disk"],
        max_identifier_length: 256,
        folds_case: true,
        connection: Some(ConnectionDef {
            jdbc: embedded("h2:file:", UrlShape::File),
            r2dbc: embedded("h2:file:///", UrlShape::File),
            compatibility_mode: None,
        }),
    },
    DialectDef {
        dialect: Dialect::H2Memory,
        tokens: &["h2memory"],
        max_identifier_length: 256,
        folds_case: true,
        connection: Some(ConnectionDef {
            jdbc: embedded("h2:mem:", UrlShape::Memory),
            r2dbc: embedded("h2:mem:///", UrlShape::Memory),
            compatibility_mode: None,
        }),
    },
    DialectDef {
        dialect: Dialect::Cassandra,
        tokens: &["cassandra"],
        max_identifier_length: 48,
        folds_case: true,
        connection: None,
    },
    DialectDef {
        dialect: Dialect::MongoDb,
        tokens: &["mongodb", "mongo"],
        max_identifier_length: 120,
        folds_case: false,
        connection: None,
    },
    DialectDef {
        dialect: Dialect::Couchbase,
        tokens: &["couchbase"],
        max_identifier_length: 251,
        folds_case: false,
        connection: None,
    },
    DialectDef {
        dialect: Dialect::Neo4j,
        tokens: &["neo4j"],
        max_identifier_length: 255,
        folds_case: false,
        connection: None,
    },
];

// ── Lookups ──────────────────────────────────────────────────────────────────

/// Registry entry for a dialect.
pub fn dialect_def(dialect: Dialect) -> &'static DialectDef {
    &DIALECT_REGISTRY[dialect as usize]
}

/// Find the entry accepting `token` (case-insensitive). `None` is the only
/// "not found" signal; callers turn it into `UnsupportedDialect`.
pub fn find_dialect(token: &str) -> Option<&'static DialectDef> {
    let token = token.trim().to_ascii_lowercase();
    DIALECT_REGISTRY
        .iter()
        .find(|def| def.tokens.contains(&token.as_str()))
}

/// Dialects that have JDBC/R2DBC drivers.
pub fn sql_dialects() -> impl Iterator<Item = Dialect> {
    DIALECT_REGISTRY
        .iter()
        .filter(|def| def.connection.is_some())
        .map(|def| def.dialect)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_indexed_by_dialect() {
        assert_eq!(DIALECT_REGISTRY.len(), Dialect::ALL.len());
        for dialect in Dialect::ALL {
            assert_eq!(dialect_def(dialect).dialect, dialect);
        }
    }

    #[test]
    fn first_token_is_canonical() {
        for def in DIALECT_REGISTRY {
            assert_eq!(def.tokens[0], def.dialect.as_str().to_ascii_lowercase());
        }
    }

    #[test]
    fn tokens_are_unique_and_lowercase() {
        let mut seen = std::collections::HashSet::new();
        for def in DIALECT_REGISTRY {
            for token in def.tokens {
                assert_eq!(*token, token.to_ascii_lowercase());
                assert!(seen.insert(*token), "duplicate token {token}");
            }
        }
    }

    #[test]
    fn known_limits() {
        assert_eq!(dialect_def(Dialect::PostgreSql).max_identifier_length, 63);
        assert_eq!(dialect_def(Dialect::MySql).max_identifier_length, 64);
        assert_eq!(dialect_def(Dialect::Oracle).max_identifier_length, 30);
    }

    #[test]
    fn limits_leave_room_for_shortened_names() {
        // prefix "rel_" + separator + hash tag + "_id" must always fit.
        for def in DIALECT_REGISTRY {
            assert!(def.max_identifier_length >= 16, "{}", def.dialect);
        }
    }

    #[test]
    fn find_dialect_handles_aliases_and_whitespace() {
        assert_eq!(find_dialect(" SQLServer ").map(|d| d.dialect), Some(Dialect::MsSql));
        assert!(find_dialect("db2").is_none());
        assert!(find_dialect("").is_none());
    }

    #[test]
    fn embedded_dialects_have_no_compatibility_mode_of_their_own() {
        for dialect in [Dialect::H2Disk, Dialect::H2Memory] {
            let conn = dialect_def(dialect).connection.unwrap();
            assert!(conn.compatibility_mode.is_none());
            assert!(conn.jdbc.mode_parameter.is_some());
        }
    }

    #[test]
    fn sql_dialects_excludes_nosql() {
        let sql: Vec<_> = sql_dialects().collect();
        assert!(sql.contains(&Dialect::PostgreSql));
        assert!(!sql.contains(&Dialect::MongoDb));
        assert!(!sql.contains(&Dialect::Cassandra));
    }
}
