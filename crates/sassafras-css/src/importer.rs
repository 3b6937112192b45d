//! `@import` resolution: search paths and the import cache.
//!
//! The importer owns the ordered search path and a cache keyed by the
//! resolved file path. Cache entries go through two states: a [`Pending`]
//! placeholder is inserted before the file compiles, so a file importing
//! itself (directly or around a cycle) is detected and ignored; afterwards
//! the entry holds a snapshot of the scope the import produced plus the
//! compiled stylesheet (unless the file was a partial, which contributes
//! variables only).
//!
//! [`Pending`]: ImportEntry::Pending

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sassafras_tree::TokenTree;

use crate::error::CompileError;
use crate::scope::Scope;

/// State of one cached import.
#[derive(Debug)]
pub enum ImportEntry {
    /// Currently being imported; hitting this means recursive inclusion.
    Pending,
    /// Fully imported.
    Cached {
        /// Snapshot of the scope after compiling the file.
        scope: Scope,
        /// The compiled stylesheet, `None` for partials.
        style_sheet: Option<TokenTree>,
    },
}

/// Search paths plus the import cache.
#[derive(Debug)]
pub struct Importer {
    paths: Vec<PathBuf>,
    cache: HashMap<PathBuf, ImportEntry>,
}

impl Importer {
    /// An importer with the default `stylesheets` search path.
    #[must_use]
    pub fn new() -> Self {
        Importer {
            paths: vec![PathBuf::from("stylesheets")],
            cache: HashMap::new(),
        }
    }

    /// Append a directory to the search path.
    pub fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// Resolve `file_name` against the search path plus the importing
    /// stylesheet's directory. A sibling `_name` partial wins over the
    /// plain file and flags the import as variables-only.
    ///
    /// # Errors
    /// Fails when no candidate exists.
    pub fn resolve(
        &self,
        file_name: &str,
        style_sheet_path: &Path,
    ) -> Result<(PathBuf, bool), CompileError> {
        let with_extension = if file_name.ends_with(".scss") {
            file_name.to_string()
        } else {
            format!("{file_name}.scss")
        };

        let mut paths = self.paths.clone();
        paths.push(style_sheet_path.to_path_buf());
        for prefix in &paths {
            let candidate = prefix.join(&with_extension);
            let hidden = match (candidate.parent(), candidate.file_name()) {
                (Some(dir), Some(name)) => {
                    dir.join(format!("_{}", name.to_string_lossy()))
                }
                _ => candidate.clone(),
            };

            if hidden.exists() {
                return Ok((hidden, true));
            }
            if candidate.exists() {
                return Ok((candidate, false));
            }
        }

        Err(CompileError::new(format!(
            "Could not find import \"{file_name}\" in search path: {paths:?}"
        )))
    }

    /// Look up a cache entry.
    #[must_use]
    pub fn cached(&self, path: &Path) -> Option<&ImportEntry> {
        self.cache.get(path)
    }

    /// Mark a path as being imported right now.
    pub fn mark_pending(&mut self, path: PathBuf) {
        let _ = self.cache.insert(path, ImportEntry::Pending);
    }

    /// Store the finished import.
    pub fn store(&mut self, path: PathBuf, scope: Scope, style_sheet: Option<TokenTree>) {
        let _ = self
            .cache
            .insert(path, ImportEntry::Cached { scope, style_sheet });
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}
