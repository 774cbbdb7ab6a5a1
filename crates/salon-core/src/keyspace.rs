//! Keyspace name resolution and validation.
//!
//! The keyspace is the database-level namespace that scopes every salon
//! table. It is resolved once per migration run from, in order: the explicit
//! `database.keyspace` config property, the `SALON_KEYSPACE` environment
//! variable, and finally [`DEFAULT_KEYSPACE`]. Blank values fall through to
//! the next source.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::fmt;

/// Keyspace used when neither config nor environment names one.
pub const DEFAULT_KEYSPACE: &str = "beauty_salon";

/// Environment variable consulted when the config leaves the keyspace unset.
pub const KEYSPACE_ENV_VAR: &str = "SALON_KEYSPACE";

/// Cassandra caps keyspace names at 48 characters; we keep the same limit.
const MAX_KEYSPACE_LEN: usize = 48;

/// A validated keyspace (schema) name.
///
/// Keyspace names are interpolated into DDL (`USE <ks>`,
/// `<ks>.schema_migrations`), so only ASCII alphanumerics and `_` are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Keyspace(String);

impl Keyspace {
    /// Validate `name` and wrap it.
    pub fn parse(name: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidKeyspace {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.len() > MAX_KEYSPACE_LEN {
            return Err(invalid("name is longer than 48 characters"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("only ASCII letters, digits and '_' are allowed"));
        }
        Ok(Self(name.to_string()))
    }

    /// Resolve the keyspace from config, then `SALON_KEYSPACE`, then the default.
    pub fn resolve(configured: Option<&str>) -> CoreResult<Self> {
        Self::resolve_with(configured, std::env::var(KEYSPACE_ENV_VAR).ok().as_deref())
    }

    /// Resolution with the environment value supplied by the caller.
    pub fn resolve_with(configured: Option<&str>, env_value: Option<&str>) -> CoreResult<Self> {
        fn pick(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }

        match pick(configured) {
            Some(name) => Self::parse(name),
            None => match pick(env_value) {
                Some(name) => Self::parse(name),
                None => Self::parse(DEFAULT_KEYSPACE),
            },
        }
    }

    /// Return the keyspace name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Qualify `table` with this keyspace (`ks.table`).
    pub fn qualify(&self, table: &str) -> String {
        format!("{}.{}", self.0, table)
    }
}

impl fmt::Display for Keyspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Keyspace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "keyspace_test.rs"]
mod tests;
