//! Salon backend CLI - applies and inspects schema migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod logging;

use cli::Cli;
use commands::{ls, migrate, status};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init(cli.global.verbose)?;

    match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Ls(args) => ls::execute(args, &cli.global).await,
    }
}
