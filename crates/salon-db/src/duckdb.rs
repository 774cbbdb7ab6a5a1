//! DuckDB session implementation

use crate::error::{DbError, DbResult};
use crate::traits::Session;
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB-backed session
///
/// A freshly opened session is scoped to DuckDB's `main` schema, which
/// stands in for "no keyspace bound yet".
pub struct DuckDbSession {
    conn: Mutex<Connection>,
}

impl DuckDbSession {
    /// Create a new in-memory DuckDB session
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB session from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_sync(&self, statement: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(statement)
            .map_err(|e| DbError::from(e).with_statement(statement))
    }

    fn execute_with_params_sync(&self, statement: &str, params: &[&str]) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(statement, duckdb::params_from_iter(params.iter()))
            .map_err(|e| DbError::from(e).with_statement(statement))
    }

    fn query_rows_sync(&self, sql: &str, columns: usize) -> DbResult<Vec<Vec<Option<String>>>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::from(e).with_statement(sql))?;
        let rows = stmt
            .query_map([], |row| {
                (0..columns)
                    .map(|idx| row.get::<_, Option<String>>(idx))
                    .collect::<duckdb::Result<Vec<_>>>()
            })
            .map_err(|e| DbError::from(e).with_statement(sql))?
            .collect::<duckdb::Result<Vec<_>>>()
            .map_err(|e| DbError::from(e).with_statement(sql))?;
        Ok(rows)
    }

    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(DbError::from)?;

        Ok(count > 0)
    }
}

#[async_trait]
impl Session for DuckDbSession {
    async fn execute(&self, statement: &str) -> DbResult<()> {
        self.execute_sync(statement)
    }

    async fn execute_with_params(&self, statement: &str, params: &[&str]) -> DbResult<usize> {
        self.execute_with_params_sync(statement, params)
    }

    async fn query_rows(&self, sql: &str, columns: usize) -> DbResult<Vec<Vec<Option<String>>>> {
        self.query_rows_sync(sql, columns)
    }

    async fn use_keyspace(&self, keyspace: &str) -> DbResult<()> {
        self.execute_sync(&format!("USE {keyspace}"))
    }

    async fn current_keyspace(&self) -> DbResult<Option<String>> {
        let rows = self.query_rows_sync("SELECT current_schema()", 1)?;
        Ok(rows.into_iter().next().and_then(|mut row| row.remove(0)))
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
