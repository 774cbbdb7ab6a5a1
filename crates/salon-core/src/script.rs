//! Versioned migration scripts and filename parsing.
//!
//! Scripts follow the `V<version>__<description>.<ext>` naming convention,
//! e.g. `V1__create_keyspace.cql`. Parsing never fails: a name that does not
//! fit the convention uses the whole filename for the field it cannot
//! extract.

use crate::splitter::split_statements;
use serde::Serialize;

/// A migration script discovered for the current run.
///
/// Built fresh on every run from a filename and the file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationScript {
    /// Version extracted from the filename (never empty)
    pub version: String,

    /// Human-readable description (`_` replaced by spaces)
    pub description: String,

    /// Original resource name, recorded in the ledger for audit
    pub filename: String,

    /// Full script contents, one or more `;`-terminated statements
    #[serde(skip)]
    pub raw_text: String,
}

impl MigrationScript {
    /// Build a script from its resource name and contents.
    pub fn new(filename: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            version: parse_version(&filename),
            description: parse_description(&filename),
            raw_text: raw_text.into(),
            filename,
        }
    }

    /// Split the script text into executable statements.
    pub fn statements(&self) -> Vec<String> {
        split_statements(&self.raw_text)
    }
}

/// Extract the version: the text between the first `V` and the first `__`.
///
/// Falls back to the whole filename when either delimiter is missing or the
/// range between them is empty.
pub fn parse_version(filename: &str) -> String {
    let (Some(v_pos), Some(sep)) = (filename.find('V'), filename.find("__")) else {
        return filename.to_string();
    };
    let start = v_pos + 1;
    if sep <= start {
        return filename.to_string();
    }
    filename[start..sep].to_string()
}

/// Extract the description: the text between `__` and the last `.`, with
/// underscores replaced by spaces.
///
/// Falls back to the whole filename when either delimiter is missing or the
/// extension dot sits inside the `__` separator.
pub fn parse_description(filename: &str) -> String {
    let (Some(sep), Some(dot)) = (filename.find("__"), filename.rfind('.')) else {
        return filename.to_string();
    };
    let start = sep + 2;
    if dot < start {
        return filename.to_string();
    }
    filename[start..dot].replace('_', " ")
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
