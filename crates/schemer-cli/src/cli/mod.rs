//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use schemer_core::domain::IdentifierKind;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "schemer",
    bin_name = "schemer",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Database identifiers, connection URLs and changelog timestamps",
    long_about = "Schemer derives dialect-safe table and constraint names, \
                  builds JDBC/R2DBC connection strings and hands out \
                  strictly increasing Liquibase changelog timestamps.",
    after_help = "EXAMPLES:\n\
        \x20 schemer name fk entityName relationshipName --dialect oracle\n\
        \x20 schemer url h2Memory --database test --prod-dialect mysql\n\
        \x20 schemer changelog --count 3\n\
        \x20 schemer completions bash > /usr/share/bash-completion/completions/schemer",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a dialect-safe identifier.
    #[command(
        visible_alias = "n",
        about = "Generate a table, column, join-table or constraint name",
        after_help = "EXAMPLES:\n\
            \x20 schemer name table   BankAccount\n\
            \x20 schemer name fk      entityName relationshipName\n\
            \x20 schemer name ux      customer emailAddress --dialect oracle\n\
            \x20 schemer name join-table order product --no-snake-case"
    )]
    Name(NameArgs),

    /// Build a connection URL.
    #[command(
        about = "Build a JDBC or R2DBC connection URL",
        after_help = "EXAMPLES:\n\
            \x20 schemer url postgresql --database app\n\
            \x20 schemer url mysql      --database app --host db --port 13306 --skip-extra-options\n\
            \x20 schemer url h2Disk     --database app --dir ./target/h2db/db --r2dbc"
    )]
    Url(UrlArgs),

    /// Allocate changelog timestamps.
    #[command(
        visible_alias = "ts",
        about = "Allocate the next Liquibase changelog timestamps",
        after_help = "EXAMPLES:\n\
            \x20 schemer changelog\n\
            \x20 schemer changelog --count 5 --reproducible --base 2020-01-01\n\
            \x20 schemer changelog --project-config ./app/.schemer-rc.json --dry-run"
    )]
    Changelog(ChangelogArgs),

    /// List known dialects.
    #[command(
        visible_alias = "ls",
        about = "List supported database dialects and their limits"
    )]
    Dialects,

    /// Initialise a Schemer configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 schemer init           # platform config directory\n\
            \x20 schemer init --local   # .schemer.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 schemer completions bash > ~/.local/share/bash-completion/completions/schemer\n\
            \x20 schemer completions zsh  > ~/.zfunc/_schemer\n\
            \x20 schemer completions fish > ~/.config/fish/completions/schemer.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Schemer configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 schemer config get naming.dialect\n\
            \x20 schemer config list\n\
            \x20 schemer config path"
    )]
    Config(ConfigCommands),
}

// ── name ──────────────────────────────────────────────────────────────────────

/// Arguments for `schemer name`.
#[derive(Debug, Args)]
pub struct NameArgs {
    /// What to name.
    #[arg(value_enum, value_name = "KIND")]
    pub kind: NameKind,

    /// Entity, table or field name.
    #[arg(value_name = "PRIMARY")]
    pub primary: String,

    /// Relationship or column name (join-table, fk and ux only).
    #[arg(value_name = "SECONDARY")]
    pub secondary: Option<String>,

    /// Target dialect (defaults to `naming.dialect` from config).
    #[arg(short = 'd', long = "dialect", value_name = "DIALECT")]
    pub dialect: Option<String>,

    /// Keep the caller's casing instead of snake_casing.
    #[arg(long = "no-snake-case", help = "Do not snake_case the fragments")]
    pub no_snake_case: bool,

    /// Prefix for reserved-word table names (defaults to config).
    #[arg(long = "table-prefix", value_name = "PREFIX")]
    pub table_prefix: Option<String>,
}

/// Identifier kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NameKind {
    Table,
    Column,
    #[value(name = "join-table", alias = "rel")]
    JoinTable,
    #[value(name = "fk", alias = "foreign-key")]
    Fk,
    #[value(name = "ux", alias = "unique")]
    Ux,
}

impl From<NameKind> for IdentifierKind {
    fn from(kind: NameKind) -> Self {
        match kind {
            NameKind::Table => IdentifierKind::Table,
            NameKind::Column => IdentifierKind::Column,
            NameKind::JoinTable => IdentifierKind::JoinTable,
            NameKind::Fk => IdentifierKind::ForeignKey,
            NameKind::Ux => IdentifierKind::UniqueConstraint,
        }
    }
}

// ── url ───────────────────────────────────────────────────────────────────────

/// Arguments for `schemer url`.
#[derive(Debug, Args)]
pub struct UrlArgs {
    /// Dialect token (e.g. `postgresql`, `h2Memory`).
    #[arg(value_name = "DIALECT")]
    pub dialect: String,

    /// Database name.
    #[arg(long = "database", value_name = "NAME")]
    pub database: Option<String>,

    /// Host name (default: localhost).
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Port (default: the dialect's standard port).
    #[arg(long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// Directory for on-disk embedded databases.
    #[arg(long = "dir", value_name = "DIR")]
    pub dir: Option<String>,

    /// Production dialect an embedded database should emulate.
    #[arg(long = "prod-dialect", value_name = "DIALECT")]
    pub prod_dialect: Option<String>,

    /// Omit the dialect's default query/option string.
    #[arg(long = "skip-extra-options")]
    pub skip_extra_options: bool,

    /// Build an R2DBC URL instead of JDBC.
    #[arg(long = "r2dbc")]
    pub r2dbc: bool,
}

// ── changelog ─────────────────────────────────────────────────────────────────

/// Arguments for `schemer changelog`.
#[derive(Debug, Args)]
pub struct ChangelogArgs {
    /// How many timestamps to allocate.
    #[arg(
        short = 'n',
        long = "count",
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub count: u16,

    /// Creation timestamp (YYYY-MM-DD, RFC 3339 or YYYYMMDDHHmmss).
    #[arg(long = "base", value_name = "DATE")]
    pub base: Option<String>,

    /// Count up from the base instead of following the wall clock.
    #[arg(long = "reproducible")]
    pub reproducible: bool,

    /// Project configuration file holding the persisted counter.
    #[arg(long = "project-config", value_name = "PATH")]
    pub project_config: Option<PathBuf>,

    /// Allocate without persisting anything.
    #[arg(long = "dry-run", help = "Show what would be allocated without saving")]
    pub dry_run: bool,

    /// Pretend the current time is DATE.
    #[arg(long = "now", value_name = "DATE", hide = true)]
    pub now: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `schemer init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.schemer.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `schemer completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `schemer config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `naming.dialect`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_name_command() {
        let cli = Cli::parse_from(["schemer", "name", "fk", "order", "customer", "-d", "oracle"]);
        let Commands::Name(args) = cli.command else {
            panic!("expected Name command");
        };
        assert_eq!(args.kind, NameKind::Fk);
        assert_eq!(args.secondary.as_deref(), Some("customer"));
        assert_eq!(args.dialect.as_deref(), Some("oracle"));
    }

    #[test]
    fn name_kind_aliases() {
        let cli = Cli::parse_from(["schemer", "n", "rel", "a", "b"]);
        let Commands::Name(args) = cli.command else {
            panic!("expected Name command");
        };
        assert_eq!(IdentifierKind::from(args.kind), IdentifierKind::JoinTable);
    }

    #[test]
    fn parse_url_command() {
        let cli = Cli::parse_from([
            "schemer",
            "url",
            "h2Memory",
            "--database",
            "test",
            "--prod-dialect",
            "mysql",
            "--r2dbc",
        ]);
        let Commands::Url(args) = cli.command else {
            panic!("expected Url command");
        };
        assert!(args.r2dbc);
        assert_eq!(args.prod_dialect.as_deref(), Some("mysql"));
    }

    #[test]
    fn changelog_count_must_be_positive() {
        assert!(Cli::try_parse_from(["schemer", "changelog", "--count", "0"]).is_err());
        let cli = Cli::parse_from(["schemer", "ts"]);
        let Commands::Changelog(args) = cli.command else {
            panic!("expected Changelog command");
        };
        assert_eq!(args.count, 1);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["schemer", "--quiet", "--verbose", "dialects"]);
        assert!(result.is_err());
    }
}
