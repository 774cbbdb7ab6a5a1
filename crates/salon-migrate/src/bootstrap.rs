//! Session bootstrap: creating the keyspace before the session can use it.
//!
//! The session is opened without a keyspace bound, and the first migration
//! script is usually the one that creates the keyspace. The ledger table has
//! to live inside that keyspace, so the keyspace-creating script runs before
//! the ledger exists and is only recorded once it does.

use crate::error::MigrateResult;
use crate::ledger::MigrationLedger;
use crate::runner::execute_script;
use salon_core::{Keyspace, MigrationScript};
use salon_db::Session;
use std::collections::BTreeSet;

/// Statement prefixes that create a keyspace. CQL accepts `CREATE SCHEMA`
/// as a synonym for `CREATE KEYSPACE`, and it is DuckDB's spelling.
pub const KEYSPACE_CREATION_KEYWORDS: &[&str] = &["CREATE KEYSPACE", "CREATE SCHEMA"];

/// Case-insensitive check for a keyspace-creation statement in `text`.
pub fn creates_keyspace(text: &str) -> bool {
    let upper = text.to_uppercase();
    KEYSPACE_CREATION_KEYWORDS
        .iter()
        .any(|keyword| upper.contains(keyword))
}

/// Bootstrap steps for one run, bound to the run's session and keyspace.
pub struct SessionBootstrapper<'a> {
    session: &'a dyn Session,
    keyspace: Keyspace,
}

impl<'a> SessionBootstrapper<'a> {
    /// Resolve the keyspace (config, then `SALON_KEYSPACE`, then default).
    pub fn resolve(session: &'a dyn Session, configured: Option<&str>) -> MigrateResult<Self> {
        let keyspace = Keyspace::resolve(configured)?;
        Ok(Self::new(session, keyspace))
    }

    /// Bootstrap against an already resolved keyspace.
    pub fn new(session: &'a dyn Session, keyspace: Keyspace) -> Self {
        Self { session, keyspace }
    }

    /// The keyspace resolved for this run
    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    /// Run the first script on the unscoped session if it creates the keyspace.
    ///
    /// Returns the script that was applied early. It is not written to the
    /// ledger here because the ledger table does not exist yet; see
    /// [`record_early`](Self::record_early).
    pub async fn apply_early<'s>(
        &self,
        scripts: &'s [MigrationScript],
    ) -> MigrateResult<Option<&'s MigrationScript>> {
        let Some(first) = scripts.first() else {
            return Ok(None);
        };
        if !creates_keyspace(&first.raw_text) {
            return Ok(None);
        }

        log::info!(
            "[MIGRATIONS] Detected keyspace creation in V{} ({}). Applying early before creating migrations table...",
            first.version,
            first.description
        );
        execute_script(self.session, first).await?;
        Ok(Some(first))
    }

    /// Scope the session to the keyspace.
    ///
    /// A failure is logged and swallowed: if the keyspace really is missing,
    /// the ledger and script statements fail next with a more specific error.
    pub async fn switch_keyspace(&self) -> bool {
        match self.session.use_keyspace(self.keyspace.as_str()).await {
            Ok(()) => {
                log::info!("[MIGRATIONS] Switched to keyspace: {}", self.keyspace);
                true
            }
            Err(e) => {
                log::warn!(
                    "[MIGRATIONS] Could not switch to keyspace {}: {e}",
                    self.keyspace
                );
                false
            }
        }
    }

    /// Record the early script once the ledger exists.
    ///
    /// Returns `true` when the row was written now (first run) and `false`
    /// when the ledger already had it.
    pub async fn record_early(
        &self,
        ledger: &MigrationLedger<'_>,
        script: &MigrationScript,
        applied: &mut BTreeSet<String>,
    ) -> MigrateResult<bool> {
        if applied.contains(&script.version) {
            return Ok(false);
        }

        ledger
            .record_applied(&script.version, &script.description, &script.filename)
            .await?;
        applied.insert(script.version.clone());
        log::info!(
            "[MIGRATIONS] Early keyspace migration V{} recorded as applied.",
            script.version
        );
        Ok(true)
    }
}

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;
