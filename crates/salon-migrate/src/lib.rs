//! Schema migration engine for the salon backend.
//!
//! Brings a keyspace up to date at process startup: discovers versioned
//! scripts, creates the keyspace before the session is scoped to it, applies
//! each script at most once, and keeps a ledger of what has been applied in
//! `<keyspace>.schema_migrations`.
//!
//! The hosting process must not serve schema-dependent requests until
//! [`MigrationRunner::run`] has returned `Ok`.

pub mod bootstrap;
pub mod embedded;
pub mod error;
pub mod ledger;
pub mod runner;
pub mod status;
#[cfg(test)]
pub(crate) mod test_utils;

pub use bootstrap::{creates_keyspace, SessionBootstrapper};
pub use embedded::{EmbeddedScriptSource, SalonScripts};
pub use error::{MigrateError, MigrateResult};
pub use ledger::{AppliedMigrationRecord, MigrationLedger, LEDGER_TABLE};
pub use runner::{MigrationReport, MigrationRunner, RunState};
pub use status::{MigrationStatus, ScriptState, ScriptStatus};
