//! The migration ledger: `<keyspace>.schema_migrations`.
//!
//! Rows are append-only. The engine never updates or deletes them; a
//! duplicate insert of the same version overwrites the row with identical
//! content, mirroring primary-key upsert semantics of the wide-column store.

use crate::error::{MigrateError, MigrateResult};
use chrono::NaiveDateTime;
use salon_core::Keyspace;
use salon_db::Session;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Name of the ledger table inside the keyspace.
pub const LEDGER_TABLE: &str = "schema_migrations";

const INSTALLED_ON_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigrationRecord {
    /// Applied version (primary key)
    pub version: String,
    /// Description parsed from the script filename
    pub description: String,
    /// Script filename
    pub script: String,
    /// Database-assigned application time
    pub installed_on: Option<NaiveDateTime>,
}

/// Ledger operations bound to one session and keyspace.
pub struct MigrationLedger<'a> {
    session: &'a dyn Session,
    table: String,
}

impl<'a> MigrationLedger<'a> {
    /// Bind the ledger for `keyspace` to `session`.
    pub fn new(session: &'a dyn Session, keyspace: &Keyspace) -> Self {
        Self {
            session,
            table: keyspace.qualify(LEDGER_TABLE),
        }
    }

    /// Fully qualified ledger table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the ledger table if it does not exist. Safe to call every run.
    pub async fn ensure_table(&self) -> MigrateResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             version TEXT PRIMARY KEY, \
             description TEXT, \
             script TEXT, \
             installed_on TIMESTAMP\
             )",
            self.table
        );
        self.session
            .execute(&sql)
            .await
            .map_err(MigrateError::LedgerUnavailable)
    }

    /// All recorded versions, or an empty set if the ledger cannot be read.
    ///
    /// This is fail-open: a transient read failure makes every script look
    /// unapplied, which can re-apply scripts that are not idempotent.
    pub async fn applied_versions(&self) -> BTreeSet<String> {
        match self.try_applied_versions().await {
            Ok(versions) => versions,
            Err(e) => {
                log::warn!(
                    "[MIGRATIONS] Could not fetch applied versions, assuming none applied: {e}"
                );
                BTreeSet::new()
            }
        }
    }

    /// All recorded versions, propagating read failures.
    pub async fn try_applied_versions(&self) -> MigrateResult<BTreeSet<String>> {
        let rows = self
            .session
            .query_rows(&format!("SELECT version FROM {}", self.table), 1)
            .await
            .map_err(MigrateError::LedgerUnavailable)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next().flatten())
            .collect())
    }

    /// Append one row. `installed_on` is assigned by the database.
    pub async fn record_applied(
        &self,
        version: &str,
        description: &str,
        script: &str,
    ) -> MigrateResult<()> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} (version, description, script, installed_on) \
             VALUES (?, ?, ?, now())",
            self.table
        );
        self.session
            .execute_with_params(&sql, &[version, description, script])
            .await
            .map_err(|source| MigrateError::LedgerWrite {
                version: version.to_string(),
                source,
            })?;
        Ok(())
    }

    /// Script filename recorded for each version, or an empty map if the
    /// ledger cannot be read.
    pub async fn recorded_scripts(&self) -> BTreeMap<String, String> {
        match self.records().await {
            Ok(records) => records.into_iter().map(|r| (r.version, r.script)).collect(),
            Err(e) => {
                log::debug!("[MIGRATIONS] Could not read recorded script names: {e}");
                BTreeMap::new()
            }
        }
    }

    /// Every ledger row, ordered by version.
    pub async fn records(&self) -> MigrateResult<Vec<AppliedMigrationRecord>> {
        let sql = format!(
            "SELECT version, description, script, strftime(installed_on, '{INSTALLED_ON_FORMAT}') \
             FROM {} ORDER BY version",
            self.table
        );
        let rows = self
            .session
            .query_rows(&sql, 4)
            .await
            .map_err(MigrateError::LedgerUnavailable)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let mut cols = row.into_iter();
                let version = cols.next().flatten()?;
                let description = cols.next().flatten().unwrap_or_default();
                let script = cols.next().flatten().unwrap_or_default();
                let installed_on = cols
                    .next()
                    .flatten()
                    .and_then(|ts| NaiveDateTime::parse_from_str(&ts, INSTALLED_ON_FORMAT).ok());
                Some(AppliedMigrationRecord {
                    version,
                    description,
                    script,
                    installed_on,
                })
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
