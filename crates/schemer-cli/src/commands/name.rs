//! `schemer name`: generate one dialect-safe identifier.

use schemer_core::application::SchemaService;
use schemer_core::domain::IdentifierKind;
use tracing::{debug, instrument};

use crate::{
    cli::NameArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(kind = ?args.kind))]
pub fn execute(args: NameArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let kind = IdentifierKind::from(args.kind);

    if kind.is_pair() && args.secondary.is_none() {
        return Err(CliError::invalid_input(format!(
            "'{}' names need a SECONDARY argument",
            kind.as_str()
        )));
    }

    let service = build_service(&args, &config)?;
    debug!(dialect = %service.dialect(), "Naming service ready");

    let generated = service.generate(kind, &args.primary, args.secondary.as_deref());

    if output.is_json() {
        output.json(&generated)?;
        return Ok(());
    }

    output.result(&generated.name)?;
    if generated.shortened {
        output.info(&format!(
            "Shortened to fit the {}-character limit of {}",
            generated.limit, generated.dialect
        ))?;
    }
    Ok(())
}

/// Flags take precedence over the `[naming]` config section.
fn build_service(args: &NameArgs, config: &AppConfig) -> CliResult<SchemaService> {
    let token = args.dialect.as_deref().unwrap_or(&config.naming.dialect);
    let prefix = args
        .table_prefix
        .clone()
        .unwrap_or_else(|| config.naming.table_prefix.clone());

    Ok(SchemaService::for_dialect(token)?
        .with_disable_snake_case(args.no_snake_case || config.naming.disable_snake_case)
        .with_table_prefix(prefix))
}
