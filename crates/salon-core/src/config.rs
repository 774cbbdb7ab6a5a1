//! Configuration types and parsing for salon.yml

use crate::error::{CoreError, CoreResult};
use crate::keyspace::Keyspace;
use crate::serde_helpers::default_true;
use crate::source::DEFAULT_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main project configuration from salon.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Application name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Schema migration settings
    #[serde(default)]
    pub migrations: MigrationsConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Explicit keyspace; falls back to `SALON_KEYSPACE`, then `beauty_salon`
    #[serde(default)]
    pub keyspace: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            keyspace: None,
        }
    }
}

/// Schema migration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationsConfig {
    /// Run migrations at startup (turn off for read-only replicas)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory scanned for `V<version>__<description>.<ext>` scripts
    #[serde(default = "default_location")]
    pub location: String,

    /// Use the scripts compiled into the binary instead of `location`
    #[serde(default)]
    pub embedded: bool,

    /// File extensions recognised as scripts (without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            location: default_location(),
            embedded: false,
            extensions: default_extensions(),
        }
    }
}

fn default_db_path() -> String {
    "salon.duckdb".to_string()
}

fn default_location() -> String {
    "db/migration".to_string()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {e}", path.display()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, looking for salon.yml or salon.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("salon.yml");
        let yaml_path = dir.join("salon.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate configuration values
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Application name cannot be empty".to_string(),
            });
        }

        if self.migrations.extensions.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations.extensions must list at least one extension".to_string(),
            });
        }

        if let Some(keyspace) = self.database.keyspace.as_deref() {
            if !keyspace.trim().is_empty() {
                Keyspace::parse(keyspace.trim())?;
            }
        }

        Ok(())
    }

    /// Resolve the keyspace: config, then environment, then default
    pub fn keyspace(&self) -> CoreResult<Keyspace> {
        Keyspace::resolve(self.database.keyspace.as_deref())
    }

    /// Get the absolute migrations directory
    pub fn migrations_location_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations.location)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
