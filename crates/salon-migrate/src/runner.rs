//! The migration runner: one pass over the script set per process start.

use crate::bootstrap::SessionBootstrapper;
use crate::embedded::{EmbeddedScriptSource, SalonScripts};
use crate::error::{MigrateError, MigrateResult};
use crate::ledger::MigrationLedger;
use crate::status::{MigrationStatus, ScriptState, ScriptStatus};
use salon_core::source::check_unique_versions;
use salon_core::{Config, DirectoryScriptSource, Keyspace, MigrationScript, ScriptSource};
use salon_db::Session;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

/// Where a run is (or stopped).
///
/// `Failed` is terminal; there is no rollback of work already done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum RunState {
    NotStarted,
    Bootstrapping,
    LedgerReady,
    /// Working on the script at this position in the sorted set
    Applying(usize),
    Complete,
    Failed,
    /// Migrations are switched off; the session was not touched
    Disabled,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::NotStarted => write!(f, "not started"),
            RunState::Bootstrapping => write!(f, "bootstrapping"),
            RunState::LedgerReady => write!(f, "ledger ready"),
            RunState::Applying(i) => write!(f, "applying script #{}", i + 1),
            RunState::Complete => write!(f, "complete"),
            RunState::Failed => write!(f, "failed"),
            RunState::Disabled => write!(f, "disabled"),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub state: RunState,
    /// Keyspace the run targeted; `None` when nothing was resolved
    pub keyspace: Option<Keyspace>,
    /// Version executed before the ledger existed, if any
    pub early: Option<String>,
    /// Versions recorded in the ledger by this run, in order
    pub applied: Vec<String>,
    /// Versions found already applied
    pub skipped: Vec<String>,
    /// Applied versions whose ledger row names a different script file
    pub drifted: Vec<String>,
}

impl MigrationReport {
    fn empty(state: RunState) -> Self {
        Self {
            state,
            keyspace: None,
            early: None,
            applied: Vec::new(),
            skipped: Vec::new(),
            drifted: Vec::new(),
        }
    }
}

/// Execute every statement of `script` in order, stopping at the first failure.
///
/// Returns the number of statements executed.
pub(crate) async fn execute_script(
    session: &dyn Session,
    script: &MigrationScript,
) -> MigrateResult<usize> {
    let statements = script.statements();
    for (index, statement) in statements.iter().enumerate() {
        log::debug!(
            "[MIGRATIONS] V{} statement {}: {}",
            script.version,
            index + 1,
            statement.lines().next().unwrap_or_default()
        );
        session
            .execute(statement)
            .await
            .map_err(|source| MigrateError::StatementFailed {
                version: script.version.clone(),
                script: script.filename.clone(),
                index: index + 1,
                statement: statement.clone(),
                source,
            })?;
    }
    Ok(statements.len())
}

/// Brings a keyspace up to date with a script set.
pub struct MigrationRunner {
    source: Box<dyn ScriptSource>,
    keyspace: Option<String>,
    enabled: bool,
    state: Mutex<RunState>,
}

impl MigrationRunner {
    /// Runner over `source`; `keyspace` is the configured name, if any.
    pub fn new(source: Box<dyn ScriptSource>, keyspace: Option<String>) -> Self {
        Self {
            source,
            keyspace,
            enabled: true,
            state: Mutex::new(RunState::NotStarted),
        }
    }

    /// Runner wired from `salon.yml`, resolving the script directory against `root`.
    pub fn from_config(config: &Config, root: &Path) -> Self {
        let extensions = config.migrations.extensions.clone();
        let source: Box<dyn ScriptSource> = if config.migrations.embedded {
            Box::new(EmbeddedScriptSource::<SalonScripts>::new().with_extensions(extensions))
        } else {
            Box::new(
                DirectoryScriptSource::new(config.migrations_location_absolute(root))
                    .with_extensions(extensions),
            )
        };
        Self::new(source, config.database.keyspace.clone()).enabled(config.migrations.enabled)
    }

    /// Turn the run on or off
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Location of the script source, for log lines
    pub fn location(&self) -> String {
        self.source.location()
    }

    /// State reached by the most recent run
    pub fn state(&self) -> RunState {
        self.state.lock().map(|s| *s).unwrap_or(RunState::Failed)
    }

    fn set_state(&self, state: RunState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }

    /// Discovered scripts, sorted and checked for duplicate versions.
    pub fn scripts(&self) -> MigrateResult<Vec<MigrationScript>> {
        let scripts = self.source.list_scripts()?;
        check_unique_versions(&scripts)?;
        Ok(scripts)
    }

    /// Apply every pending script. Must complete before the host serves traffic.
    pub async fn run(&self, session: &dyn Session) -> MigrateResult<MigrationReport> {
        if !self.enabled {
            log::info!("[MIGRATIONS] Migrations are disabled. Skipping.");
            self.set_state(RunState::Disabled);
            return Ok(MigrationReport::empty(RunState::Disabled));
        }

        self.set_state(RunState::NotStarted);
        let result = self.run_inner(session).await;
        match &result {
            Ok(report) => self.set_state(report.state),
            Err(e) => {
                log::error!("[MIGRATIONS] Migration run failed: {e}");
                self.set_state(RunState::Failed);
            }
        }
        result
    }

    async fn run_inner(&self, session: &dyn Session) -> MigrateResult<MigrationReport> {
        let scripts = self.scripts()?;
        if scripts.is_empty() {
            log::info!("[MIGRATIONS] No migration files found. Skipping.");
            return Ok(MigrationReport::empty(RunState::Complete));
        }

        log::info!(
            "[MIGRATIONS] Found {} migration script(s) in {}",
            scripts.len(),
            self.source.location()
        );
        for script in &scripts {
            log::info!(
                "[MIGRATIONS]   V{} - {} ({})",
                script.version,
                script.description,
                script.filename
            );
        }

        self.set_state(RunState::Bootstrapping);
        let bootstrapper = SessionBootstrapper::resolve(session, self.keyspace.as_deref())?;
        let mut report = MigrationReport::empty(RunState::Bootstrapping);
        report.keyspace = Some(bootstrapper.keyspace().clone());

        let early = bootstrapper.apply_early(&scripts).await?;
        bootstrapper.switch_keyspace().await;

        let ledger = MigrationLedger::new(session, bootstrapper.keyspace());
        if let Err(e) = ledger.ensure_table().await {
            log::warn!("[MIGRATIONS] Could not create {}: {e}", ledger.table());
        }
        let mut applied: BTreeSet<String> = ledger.applied_versions().await;
        let recorded: BTreeMap<String, String> = ledger.recorded_scripts().await;

        if let Some(script) = early {
            report.early = Some(script.version.clone());
            if bootstrapper.record_early(&ledger, script, &mut applied).await? {
                report.applied.push(script.version.clone());
            }
        }
        self.set_state(RunState::LedgerReady);

        for (index, script) in scripts.iter().enumerate() {
            self.set_state(RunState::Applying(index));

            if applied.contains(&script.version) {
                log::info!(
                    "[MIGRATIONS] Skipping already applied migration V{} ({})",
                    script.version,
                    script.description
                );
                if !report.applied.contains(&script.version) {
                    report.skipped.push(script.version.clone());
                }
                if let Some(previous) = recorded.get(&script.version) {
                    if previous != &script.filename {
                        log::warn!(
                            "[MIGRATIONS] V{} was applied from {previous} but is now shipped as {}. \
                             Applied scripts must not be edited; add a new version instead.",
                            script.version,
                            script.filename
                        );
                        report.drifted.push(script.version.clone());
                    }
                }
                continue;
            }

            log::info!(
                "[MIGRATIONS] Applying migration V{} ({}) from {}",
                script.version,
                script.description,
                script.filename
            );
            if let Err(e) = execute_script(session, script).await {
                log::error!("[MIGRATIONS] Migration V{} failed: {e}", script.version);
                return Err(e);
            }
            ledger
                .record_applied(&script.version, &script.description, &script.filename)
                .await?;
            applied.insert(script.version.clone());
            report.applied.push(script.version.clone());
            log::info!(
                "[MIGRATIONS] Migration V{} applied successfully.",
                script.version
            );
        }

        log::info!("[MIGRATIONS] All migrations completed.");
        report.state = RunState::Complete;
        Ok(report)
    }

    /// Blocking [`run`](Self::run) for synchronous hosts.
    ///
    /// Starts its own current-thread runtime, so it must not be called from
    /// inside an async context.
    pub fn run_blocking(&self, session: &dyn Session) -> MigrateResult<MigrationReport> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(MigrateError::Runtime)?;
        runtime.block_on(self.run(session))
    }

    /// Read-only view of which scripts are applied, pending or orphaned.
    ///
    /// Unlike [`run`](Self::run) this does not fail open: if the ledger
    /// exists but cannot be read, the error is returned. A missing ledger
    /// table means nothing has been applied yet.
    pub async fn status(&self, session: &dyn Session) -> MigrateResult<MigrationStatus> {
        let scripts = self.scripts()?;
        let keyspace = Keyspace::resolve(self.keyspace.as_deref())?;
        let ledger = MigrationLedger::new(session, &keyspace);

        let ledger_exists = session
            .relation_exists(ledger.table())
            .await
            .map_err(MigrateError::LedgerUnavailable)?;
        let records = if ledger_exists {
            ledger.records().await?
        } else {
            Vec::new()
        };

        let mut entries: Vec<ScriptStatus> = scripts
            .iter()
            .map(|script| {
                let state = match records.iter().find(|r| r.version == script.version) {
                    Some(record) => ScriptState::Applied {
                        installed_on: record.installed_on,
                    },
                    None => ScriptState::Pending,
                };
                ScriptStatus {
                    version: script.version.clone(),
                    description: script.description.clone(),
                    script: script.filename.clone(),
                    state,
                }
            })
            .collect();

        for record in &records {
            if !scripts.iter().any(|s| s.version == record.version) {
                entries.push(ScriptStatus {
                    version: record.version.clone(),
                    description: record.description.clone(),
                    script: record.script.clone(),
                    state: ScriptState::Orphaned {
                        installed_on: record.installed_on,
                    },
                });
            }
        }

        Ok(MigrationStatus {
            keyspace,
            location: self.source.location(),
            scripts: entries,
        })
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
