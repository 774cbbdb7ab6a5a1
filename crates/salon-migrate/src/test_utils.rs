//! Shared test utilities for salon-migrate

use async_trait::async_trait;
use salon_core::source::sort_scripts;
use salon_core::{CoreResult, Keyspace, MigrationScript, ScriptSource};
use salon_db::{DbError, DbResult, DuckDbSession, Session};
use std::sync::Mutex;

/// In-memory DuckDB session that records every statement it sees and can
/// be told to fail statements containing a given substring.
pub(crate) struct RecordingSession {
    inner: DuckDbSession,
    log: Mutex<Vec<String>>,
    fail_on: Vec<String>,
}

impl RecordingSession {
    pub(crate) fn new() -> Self {
        Self {
            inner: DuckDbSession::in_memory().unwrap(),
            log: Mutex::new(Vec::new()),
            fail_on: Vec::new(),
        }
    }

    /// Fail any statement containing `needle`
    pub(crate) fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    /// Everything executed so far, in order
    pub(crate) fn statements(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Index of the first recorded statement containing `needle`
    pub(crate) fn position(&self, needle: &str) -> Option<usize> {
        self.statements().iter().position(|s| s.contains(needle))
    }

    /// Number of recorded statements containing `needle`
    pub(crate) fn count(&self, needle: &str) -> usize {
        self.statements().iter().filter(|s| s.contains(needle)).count()
    }

    fn record(&self, sql: &str) -> DbResult<()> {
        self.log.lock().unwrap().push(sql.to_string());
        if self.fail_on.iter().any(|needle| sql.contains(needle.as_str())) {
            return Err(DbError::ExecutionError(format!("injected failure: {sql}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn execute(&self, statement: &str) -> DbResult<()> {
        self.record(statement)?;
        self.inner.execute(statement).await
    }

    async fn execute_with_params(&self, statement: &str, params: &[&str]) -> DbResult<usize> {
        self.record(statement)?;
        self.inner.execute_with_params(statement, params).await
    }

    async fn query_rows(&self, sql: &str, columns: usize) -> DbResult<Vec<Vec<Option<String>>>> {
        self.record(sql)?;
        self.inner.query_rows(sql, columns).await
    }

    async fn use_keyspace(&self, keyspace: &str) -> DbResult<()> {
        self.record(&format!("USE {keyspace}"))?;
        self.inner.use_keyspace(keyspace).await
    }

    async fn current_keyspace(&self) -> DbResult<Option<String>> {
        self.inner.current_keyspace().await
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.inner.relation_exists(name).await
    }

    fn db_type(&self) -> &'static str {
        "recording"
    }
}

/// The keyspace most tests run against
pub(crate) fn salon_keyspace() -> Keyspace {
    Keyspace::parse("beauty_salon").unwrap()
}

/// Shorthand for building a script
pub(crate) fn script(filename: &str, text: &str) -> MigrationScript {
    MigrationScript::new(filename, text)
}

/// A first script that creates the salon keyspace
pub(crate) fn keyspace_script() -> MigrationScript {
    script(
        "V1__create_keyspace.cql",
        "CREATE SCHEMA IF NOT EXISTS beauty_salon;",
    )
}

/// Script source backed by an in-memory list, sorted like a real source
pub(crate) struct StaticSource(pub(crate) Vec<MigrationScript>);

impl StaticSource {
    pub(crate) fn boxed(mut scripts: Vec<MigrationScript>) -> Box<dyn ScriptSource> {
        sort_scripts(&mut scripts);
        Box::new(Self(scripts))
    }
}

impl ScriptSource for StaticSource {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn list_scripts(&self) -> CoreResult<Vec<MigrationScript>> {
        Ok(self.0.clone())
    }
}
