//! Status command implementation

use anyhow::{Context, Result};
use salon_migrate::MigrationStatus;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{column_width, load_project, print_json};

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global, args.embedded)?;
    let session = project.open_session()?;
    let status = project
        .runner()
        .status(&session)
        .await
        .context("Failed to read migration status")?;

    match args.output {
        OutputFormat::Table => print_table(&status),
        OutputFormat::Json => print_json(&status)?,
    }
    Ok(())
}

fn print_table(status: &MigrationStatus) {
    println!("Keyspace: {}", status.keyspace);
    println!("Scripts:  {}", status.location);
    println!();

    if status.scripts.is_empty() {
        println!("No migration scripts found.");
        return;
    }

    let version_width = column_width("VERSION", status.scripts.iter().map(|s| s.version.as_str()));
    let state_width = "ORPHANED".len();
    let installed_width = "YYYY-MM-DD HH:MM:SS".len();

    println!(
        "{:<version_width$}  {:<state_width$}  {:<installed_width$}  SCRIPT",
        "VERSION", "STATE", "INSTALLED_ON"
    );
    println!(
        "{:-<version_width$}  {:-<state_width$}  {:-<installed_width$}  {}",
        "",
        "",
        "",
        "-".repeat(30)
    );

    for entry in &status.scripts {
        let installed = entry
            .state
            .installed_on()
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<version_width$}  {:<state_width$}  {:<installed_width$}  {}",
            entry.version,
            entry.state.label().to_uppercase(),
            installed,
            entry.script
        );
    }

    let pending = status.pending().count();
    println!();
    if pending == 0 {
        println!("Schema is up to date.");
    } else {
        println!("{pending} pending migration(s).");
    }
}
