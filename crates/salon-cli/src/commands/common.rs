//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use salon_core::Config;
use salon_db::DuckDbSession;
use salon_migrate::MigrationRunner;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Project configuration with the CLI overrides applied.
pub(crate) struct LoadedProject {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl LoadedProject {
    /// Migration runner for this project
    pub(crate) fn runner(&self) -> MigrationRunner {
        MigrationRunner::from_config(&self.config, &self.root)
    }

    /// Open the configured database
    pub(crate) fn open_session(&self) -> Result<DuckDbSession> {
        let path = resolve_db_path(&self.root, &self.config.database.path);
        log::debug!("Opening database {path}");
        DuckDbSession::new(&path).context("Failed to connect to database")
    }
}

/// Load `salon.yml` from the project directory (or `--config`) and apply
/// `--target`, `--keyspace` and `--embedded`.
pub(crate) fn load_project(global: &GlobalArgs, embedded: bool) -> Result<LoadedProject> {
    let root = PathBuf::from(&global.project_dir);
    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project config")?;

    apply_overrides(&mut config, global, embedded);
    Ok(LoadedProject { root, config })
}

/// Apply command-line overrides on top of the file config.
pub(crate) fn apply_overrides(config: &mut Config, global: &GlobalArgs, embedded: bool) {
    if let Some(target) = &global.target {
        config.database.path = target.clone();
    }
    if let Some(keyspace) = &global.keyspace {
        config.database.keyspace = Some(keyspace.clone());
    }
    if embedded {
        config.migrations.embedded = true;
    }
}

/// Relative database files live under the project root; `:memory:` is left alone.
pub(crate) fn resolve_db_path(root: &Path, path: &str) -> String {
    if path == ":memory:" || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

/// Print any serializable value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Width of the widest cell in a column, never narrower than the header.
pub(crate) fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(str::len).max().unwrap_or(0).max(header.len())
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
