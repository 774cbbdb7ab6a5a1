//! Migration scripts compiled into the binary.
//!
//! Hosts that ship as a single binary use [`SalonScripts`], the salon's own
//! scripts from `db/migration/`, instead of reading a directory at runtime.

use rust_embed::Embed;
use salon_core::source::{is_script_name, sort_scripts, DEFAULT_EXTENSIONS};
use salon_core::{CoreError, CoreResult, MigrationScript, ScriptSource};
use std::marker::PhantomData;

/// The salon schema scripts bundled at build time.
#[derive(Embed)]
#[folder = "db/migration/"]
pub struct SalonScripts;

/// [`ScriptSource`] over any `rust-embed` folder.
///
/// Only top-level files are considered, matching the non-recursive
/// directory scan.
pub struct EmbeddedScriptSource<E: Embed> {
    extensions: Vec<String>,
    _assets: PhantomData<fn() -> E>,
}

impl<E: Embed> EmbeddedScriptSource<E> {
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            _assets: PhantomData,
        }
    }

    /// Override the recognised extensions (without the leading dot).
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }
}

impl<E: Embed> Default for EmbeddedScriptSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Embed> ScriptSource for EmbeddedScriptSource<E> {
    fn location(&self) -> String {
        format!("embedded:{}", std::any::type_name::<E>())
    }

    fn list_scripts(&self) -> CoreResult<Vec<MigrationScript>> {
        let mut scripts = Vec::new();
        for name in E::iter() {
            if name.contains('/') || !is_script_name(&name, &self.extensions) {
                continue;
            }
            let Some(file) = E::get(&name) else {
                continue;
            };
            let raw_text = String::from_utf8(file.data.into_owned()).map_err(|e| {
                CoreError::IoWithPath {
                    path: name.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                }
            })?;
            scripts.push(MigrationScript::new(name.to_string(), raw_text));
        }

        sort_scripts(&mut scripts);
        Ok(scripts)
    }
}

#[cfg(test)]
#[path = "embedded_test.rs"]
mod tests;
