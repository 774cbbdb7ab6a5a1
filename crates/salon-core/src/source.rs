//! Migration script discovery.
//!
//! [`ScriptSource`] is the seam between the runner and wherever scripts live.
//! The filesystem implementation lives here; the embedded implementation
//! lives in `salon-migrate` next to the bundled scripts.

use crate::error::{CoreError, CoreResult};
use crate::script::MigrationScript;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extensions recognised as migration scripts when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["cql", "sql"];

/// A provider of migration scripts.
///
/// Implementations must return scripts sorted by [`sort_scripts`] and must
/// treat "no scripts" as an empty list, not an error.
pub trait ScriptSource: Send + Sync {
    /// Human-readable location, used in log lines
    fn location(&self) -> String;

    /// Discover, read and sort all scripts
    fn list_scripts(&self) -> CoreResult<Vec<MigrationScript>>;
}

/// Returns true when `filename` follows the `V*.<ext>` discovery pattern.
pub fn is_script_name(filename: &str, extensions: &[String]) -> bool {
    if !filename.starts_with('V') {
        return false;
    }
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}

/// Sort scripts lexicographically by filename.
///
/// This is a plain string sort, so `V10__x` sorts before `V2__y`. Name
/// multi-digit versions with leading zeros (`V02`, `V10`) to get numeric
/// order.
pub fn sort_scripts(scripts: &mut [MigrationScript]) {
    scripts.sort_by(|a, b| a.filename.cmp(&b.filename));
}

/// Reject a script set in which two files share a version.
pub fn check_unique_versions(scripts: &[MigrationScript]) -> CoreResult<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for script in scripts {
        if let Some(first) = seen.insert(&script.version, &script.filename) {
            return Err(CoreError::DuplicateVersion {
                version: script.version.clone(),
                first: first.to_string(),
                second: script.filename.clone(),
            });
        }
    }
    Ok(())
}

/// Scripts read from a single filesystem directory (non-recursive).
#[derive(Debug, Clone)]
pub struct DirectoryScriptSource {
    location: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryScriptSource {
    /// Scan `location` for `V*.cql` and `V*.sql` files.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Override the recognised extensions (without the leading dot).
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Directory being scanned
    pub fn path(&self) -> &Path {
        &self.location
    }
}

impl ScriptSource for DirectoryScriptSource {
    fn location(&self) -> String {
        self.location.display().to_string()
    }

    fn list_scripts(&self) -> CoreResult<Vec<MigrationScript>> {
        if !self.location.is_dir() {
            log::warn!(
                "[MIGRATIONS] Migration location {} does not exist or is not a directory",
                self.location.display()
            );
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.location).map_err(|e| CoreError::IoWithPath {
            path: self.location.display().to_string(),
            source: e,
        })?;

        let mut scripts = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_script_name(filename, &self.extensions) {
                continue;
            }

            let raw_text = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })?;
            scripts.push(MigrationScript::new(filename, raw_text));
        }

        sort_scripts(&mut scripts);
        Ok(scripts)
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
