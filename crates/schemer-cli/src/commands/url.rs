//! `schemer url`: build a JDBC or R2DBC connection string.

use std::str::FromStr;

use schemer_core::application::SchemaService;
use schemer_core::domain::{ConnectionOptions, Dialect, Protocol};
use serde::Serialize;
use tracing::instrument;

use crate::{cli::UrlArgs, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct UrlReport<'a> {
    dialect: Dialect,
    protocol: Protocol,
    url: &'a str,
}

#[instrument(skip_all, fields(dialect = %args.dialect, r2dbc = args.r2dbc))]
pub fn execute(args: UrlArgs, output: OutputManager) -> CliResult<()> {
    let service = SchemaService::for_dialect(&args.dialect)?;
    let protocol = if args.r2dbc {
        Protocol::R2dbc
    } else {
        Protocol::Jdbc
    };

    let options = connection_options(&args)?;
    let url = service.connection_url(protocol, &options)?;

    if output.is_json() {
        output.json(&UrlReport {
            dialect: service.dialect(),
            protocol,
            url: &url,
        })?;
    } else {
        output.result(&url)?;
    }
    Ok(())
}

fn connection_options(args: &UrlArgs) -> CliResult<ConnectionOptions> {
    let mut options = ConnectionOptions::new().skip_extra_options(args.skip_extra_options);

    if let Some(database) = &args.database {
        options = options.database_name(database);
    }
    if let Some(host) = &args.host {
        options = options.hostname(host);
    }
    if let Some(port) = args.port {
        options = options.port(port);
    }
    if let Some(dir) = &args.dir {
        options = options.local_directory(dir);
    }
    if let Some(prod) = &args.prod_dialect {
        options = options.prod_database_type(Dialect::from_str(prod)?);
    }
    Ok(options)
}
