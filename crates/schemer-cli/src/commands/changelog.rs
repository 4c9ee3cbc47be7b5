//! `schemer changelog`: allocate Liquibase changelog timestamps.
//!
//! The counter lives in the project's `.schemer-rc.json`. With `--dry-run`
//! the allocator works on an in-memory copy of that state and the file is
//! left untouched.

use chrono::{DateTime, Utc};
use schemer_adapters::{FixedClock, JsonConfigStore, MemoryConfigStore, SystemClock};
use schemer_core::application::{
    AllocatorOptions, CREATION_TIMESTAMP, LAST_LIQUIBASE_TIMESTAMP, TimestampAllocator,
    ports::{Clock, ConfigStore},
};
use schemer_core::domain::{ChangelogTimestamp, parse_base_timestamp};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{cli::ChangelogArgs, config::AppConfig, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct ChangelogReport<'a> {
    timestamps: &'a [ChangelogTimestamp],
    reproducible: bool,
    persisted: bool,
    project_config: String,
}

#[instrument(skip_all, fields(count = args.count, dry_run = args.dry_run))]
pub fn execute(args: ChangelogArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let options = allocator_options(&args, &config)?;

    let project_config = args
        .project_config
        .clone()
        .unwrap_or_else(|| config.changelog.project_config.clone());
    let json_store = JsonConfigStore::new(&project_config);

    let store: Box<dyn ConfigStore> = if args.dry_run {
        Box::new(MemoryConfigStore::snapshot_of(
            &json_store,
            &[LAST_LIQUIBASE_TIMESTAMP, CREATION_TIMESTAMP],
        )?)
    } else {
        Box::new(json_store)
    };

    let clock: Box<dyn Clock> = match args.now.as_deref() {
        Some(now) => Box::new(FixedClock::at(parse_base_timestamp(now)?)),
        None => Box::new(SystemClock::new()),
    };

    let mut allocator = TimestampAllocator::new(store, clock, options)?;
    let timestamps = allocator.allocate_many(usize::from(args.count))?;

    info!(
        count = timestamps.len(),
        persisted = !args.dry_run,
        "Changelog timestamps allocated"
    );

    if output.is_json() {
        output.json(&ChangelogReport {
            timestamps: &timestamps,
            reproducible: allocator.is_reproducible(),
            persisted: !args.dry_run,
            project_config: project_config.display().to_string(),
        })?;
        return Ok(());
    }

    for timestamp in &timestamps {
        output.result(&timestamp.to_string())?;
    }
    if args.dry_run {
        output.warning(&format!(
            "Dry run: {} was not updated",
            project_config.display()
        ))?;
    }
    Ok(())
}

/// `--base` beats `changelog.creation_timestamp`; either flag or config
/// turns reproducible mode on.
fn allocator_options(args: &ChangelogArgs, config: &AppConfig) -> CliResult<AllocatorOptions> {
    let base: Option<DateTime<Utc>> = args
        .base
        .as_deref()
        .or(config.changelog.creation_timestamp.as_deref())
        .map(parse_base_timestamp)
        .transpose()?;

    Ok(AllocatorOptions {
        creation_timestamp: base,
        reproducible: args.reproducible || config.changelog.reproducible,
    })
}
