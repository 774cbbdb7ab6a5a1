//! Migrate command implementation

use anyhow::{Context, Result};
use salon_migrate::{MigrationReport, RunState};

use crate::cli::{GlobalArgs, MigrateArgs, OutputFormat};
use crate::commands::common::{load_project, print_json};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let mut project = load_project(global, args.embedded)?;
    if args.skip {
        project.config.migrations.enabled = false;
    }

    let runner = project.runner();
    let session = project.open_session()?;
    let report = runner
        .run(&session)
        .await
        .with_context(|| format!("Migration failed ({})", runner.state()))?;

    match args.output {
        OutputFormat::Table => print_summary(&report),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

fn print_summary(report: &MigrationReport) {
    if report.state == RunState::Disabled {
        println!("Migrations disabled, nothing to do.");
        return;
    }
    let Some(keyspace) = &report.keyspace else {
        println!("No migration scripts found.");
        return;
    };

    println!("Keyspace: {keyspace}");
    if let Some(early) = &report.early {
        println!("Keyspace script: V{early}");
    }
    for version in &report.drifted {
        println!("  warning: V{version} was applied from a different script file");
    }
    if report.applied.is_empty() {
        println!("Schema is up to date ({} already applied).", report.skipped.len());
        return;
    }
    for version in &report.applied {
        println!("  applied V{version}");
    }
    println!(
        "Applied {} migration(s), {} already applied.",
        report.applied.len(),
        report.skipped.len()
    );
}
