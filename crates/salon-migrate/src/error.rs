//! Error types for the migration engine.
//!
//! Only fatal conditions surface as [`MigrateError`] from
//! [`crate::MigrationRunner::run`]. Recoverable ones (no scripts, malformed
//! filenames, ledger unavailable, keyspace switch failure) are logged and
//! the run continues.

use salon_core::CoreError;
use salon_db::DbError;
use thiserror::Error;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Script discovery, keyspace resolution or script-set validation failed (M001).
    #[error("[M001] Migration setup failed: {0}")]
    Setup(#[from] CoreError),

    /// A script statement failed; the run stops here (M002).
    #[error("[M002] Migration V{version} ({script}) failed at statement {index} `{statement}`: {source}")]
    StatementFailed {
        version: String,
        script: String,
        index: usize,
        statement: String,
        #[source]
        source: DbError,
    },

    /// Writing a ledger row failed (M003).
    #[error("[M003] Failed to record migration V{version} in the ledger: {source}")]
    LedgerWrite {
        version: String,
        #[source]
        source: DbError,
    },

    /// The ledger table could not be created or read (M004).
    #[error("[M004] Migration ledger unavailable: {0}")]
    LedgerUnavailable(#[source] DbError),

    /// The blocking runner could not start its runtime (M005).
    #[error("[M005] Failed to start migration runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
