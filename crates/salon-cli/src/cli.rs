//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// salon - schema migrations for the beauty salon backend
#[derive(Parser, Debug)]
#[command(name = "salon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (DuckDB file or :memory:)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override keyspace (takes precedence over salon.yml and SALON_KEYSPACE)
    #[arg(short, long, global = true)]
    pub keyspace: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations
    Migrate(MigrateArgs),

    /// Show applied, pending and orphaned migrations
    Status(StatusArgs),

    /// List discovered migration scripts
    Ls(LsArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Use the scripts compiled into the binary
    #[arg(short, long)]
    pub embedded: bool,

    /// Do not run migrations (same as migrations.enabled: false)
    #[arg(long)]
    pub skip: bool,

    /// Output format for the run summary
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Use the scripts compiled into the binary
    #[arg(short, long)]
    pub embedded: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Use the scripts compiled into the binary
    #[arg(short, long)]
    pub embedded: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Output formats shared by all commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
