//! `schemer dialects`: list the dialect registry.

use schemer_core::domain::Dialect;
use serde::Serialize;

use crate::{error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct DialectRow {
    dialect: Dialect,
    aliases: Vec<&'static str>,
    max_identifier_length: usize,
    folds_case: bool,
    jdbc: bool,
    r2dbc: bool,
}

fn rows() -> Vec<DialectRow> {
    Dialect::ALL
        .into_iter()
        .map(|dialect| {
            let def = dialect.def();
            let canonical = dialect.as_str().to_lowercase();
            DialectRow {
                dialect,
                aliases: def
                    .tokens
                    .iter()
                    .copied()
                    .filter(|token| *token != canonical)
                    .collect(),
                max_identifier_length: def.max_identifier_length,
                folds_case: def.folds_case,
                jdbc: def.connection.is_some(),
                r2dbc: def.connection.is_some(),
            }
        })
        .collect()
}

pub fn execute(output: OutputManager) -> CliResult<()> {
    let rows = rows();

    if output.is_json() {
        output.json(&rows)?;
        return Ok(());
    }

    output.header("Supported dialects:")?;
    for row in &rows {
        let aliases = if row.aliases.is_empty() {
            String::new()
        } else {
            output.dim(&format!(" (aka {})", row.aliases.join(", ")))
        };
        let urls = if row.jdbc { "jdbc, r2dbc" } else { "-" };
        output.result(&format!(
            "  {:<10} {:>3} chars  snake_case: {:<3}  urls: {}{}",
            row.dialect.as_str(),
            row.max_identifier_length,
            if row.folds_case { "yes" } else { "no" },
            urls,
            aliases,
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_dialect() {
        assert_eq!(rows().len(), Dialect::ALL.len());
    }

    #[test]
    fn oracle_row_carries_its_limit() {
        let oracle = rows()
            .into_iter()
            .find(|row| row.dialect == Dialect::Oracle)
            .unwrap();
        assert_eq!(oracle.max_identifier_length, 30);
        assert!(oracle.jdbc);
    }

    #[test]
    fn nosql_engines_have_no_urls() {
        let mongo = rows()
            .into_iter()
            .find(|row| row.dialect == Dialect::MongoDb)
            .unwrap();
        assert!(!mongo.jdbc && !mongo.r2dbc);
    }

    #[test]
    fn postgres_alias_is_listed() {
        let pg = rows()
            .into_iter()
            .find(|row| row.dialect == Dialect::PostgreSql)
            .unwrap();
        assert!(pg.aliases.contains(&"postgres"));
        assert!(!pg.aliases.contains(&"postgresql"));
    }
}
