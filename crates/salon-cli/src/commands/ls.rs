//! List command implementation

use anyhow::{Context, Result};
use salon_core::MigrationScript;
use serde::Serialize;

use crate::cli::{GlobalArgs, LsArgs, OutputFormat};
use crate::commands::common::{column_width, load_project, print_json};

/// Execute the ls command
pub async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global, args.embedded)?;
    let runner = project.runner();
    let scripts = runner
        .scripts()
        .with_context(|| format!("Failed to list scripts in {}", runner.location()))?;

    let infos: Vec<ScriptInfo> = scripts.iter().map(ScriptInfo::from).collect();
    match args.output {
        OutputFormat::Table => print_table(&infos),
        OutputFormat::Json => print_json(&infos)?,
    }
    Ok(())
}

/// Script information for display
#[derive(Debug, Serialize)]
struct ScriptInfo<'a> {
    version: &'a str,
    description: &'a str,
    script: &'a str,
    statements: usize,
}

impl<'a> From<&'a MigrationScript> for ScriptInfo<'a> {
    fn from(script: &'a MigrationScript) -> Self {
        Self {
            version: &script.version,
            description: &script.description,
            script: &script.filename,
            statements: script.statements().len(),
        }
    }
}

fn print_table(scripts: &[ScriptInfo<'_>]) {
    if scripts.is_empty() {
        println!("No migration scripts found.");
        return;
    }

    let version_width = column_width("VERSION", scripts.iter().map(|s| s.version));
    let desc_width = column_width("DESCRIPTION", scripts.iter().map(|s| s.description));
    let stmt_width = "STATEMENTS".len();

    println!(
        "{:<version_width$}  {:<desc_width$}  {:>stmt_width$}  SCRIPT",
        "VERSION", "DESCRIPTION", "STATEMENTS"
    );
    println!(
        "{:-<version_width$}  {:-<desc_width$}  {:->stmt_width$}  {}",
        "",
        "",
        "",
        "-".repeat(30)
    );
    for script in scripts {
        println!(
            "{:<version_width$}  {:<desc_width$}  {:>stmt_width$}  {}",
            script.version, script.description, script.statements, script.script
        );
    }
    println!();
    println!("{} script(s)", scripts.len());
}
