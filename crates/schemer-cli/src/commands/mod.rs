//! One module per subcommand. Each exposes an `execute` entry point.

pub mod changelog;
pub mod completions;
pub mod config;
pub mod dialects;
pub mod init;
pub mod name;
pub mod url;
