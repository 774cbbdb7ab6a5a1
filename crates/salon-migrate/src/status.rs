//! Read-only migration status, as reported by `salon status`.

use chrono::NaiveDateTime;
use salon_core::Keyspace;
use serde::Serialize;

/// Where one version stands relative to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScriptState {
    /// Recorded in the ledger
    Applied { installed_on: Option<NaiveDateTime> },
    /// Discovered but not yet recorded
    Pending,
    /// Recorded in the ledger but no longer shipped as a script
    Orphaned { installed_on: Option<NaiveDateTime> },
}

impl ScriptState {
    /// Short label for table output
    pub fn label(&self) -> &'static str {
        match self {
            ScriptState::Applied { .. } => "applied",
            ScriptState::Pending => "pending",
            ScriptState::Orphaned { .. } => "orphaned",
        }
    }

    /// When the version was applied, if the ledger says so
    pub fn installed_on(&self) -> Option<NaiveDateTime> {
        match self {
            ScriptState::Applied { installed_on } | ScriptState::Orphaned { installed_on } => {
                *installed_on
            }
            ScriptState::Pending => None,
        }
    }
}

/// Status of a single version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptStatus {
    pub version: String,
    pub description: String,
    pub script: String,
    #[serde(flatten)]
    pub state: ScriptState,
}

/// Status of every discovered script, followed by orphaned ledger rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub keyspace: Keyspace,
    pub location: String,
    pub scripts: Vec<ScriptStatus>,
}

impl MigrationStatus {
    /// Versions still waiting to run
    pub fn pending(&self) -> impl Iterator<Item = &ScriptStatus> {
        self.scripts
            .iter()
            .filter(|s| matches!(s.state, ScriptState::Pending))
    }

    /// True when every discovered script has been applied
    pub fn is_up_to_date(&self) -> bool {
        self.pending().next().is_none()
    }
}
