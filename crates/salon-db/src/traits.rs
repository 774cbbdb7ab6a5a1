//! Session trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// A single database session shared by the migration engine.
///
/// The session may be opened without any keyspace bound. `use_keyspace`
/// re-scopes it in place, so one handle is threaded by reference through
/// the whole run and nothing else may use it concurrently.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Session: Send + Sync {
    /// Execute a single statement
    async fn execute(&self, statement: &str) -> DbResult<()>;

    /// Execute a statement with positional text parameters, returns affected rows
    async fn execute_with_params(&self, statement: &str, params: &[&str]) -> DbResult<usize>;

    /// Run a query and return every row as `columns` nullable text values
    async fn query_rows(&self, sql: &str, columns: usize) -> DbResult<Vec<Vec<Option<String>>>>;

    /// Scope the session to `keyspace` (issues the keyspace-selection statement)
    async fn use_keyspace(&self, keyspace: &str) -> DbResult<()>;

    /// The keyspace the session is currently scoped to
    async fn current_keyspace(&self) -> DbResult<Option<String>>;

    /// Check if a table or view exists (`table` or `keyspace.table`)
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
