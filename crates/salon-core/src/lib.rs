//! salon-core - Core library for the salon backend
//!
//! This crate provides configuration parsing, keyspace resolution, and the
//! pure half of the schema migration engine: script discovery, filename
//! parsing, and statement splitting. Nothing here talks to a database.

pub mod config;
pub mod error;
pub mod keyspace;
pub mod script;
pub(crate) mod serde_helpers;
pub mod source;
pub mod splitter;

pub use config::{Config, DatabaseConfig, MigrationsConfig};
pub use error::{CoreError, CoreResult};
pub use keyspace::{Keyspace, DEFAULT_KEYSPACE, KEYSPACE_ENV_VAR};
pub use script::MigrationScript;
pub use source::{DirectoryScriptSource, ScriptSource};
pub use splitter::split_statements;
