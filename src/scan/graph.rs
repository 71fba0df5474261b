//! Import graph construction.
//!
//! The [`ImportGraphScanner`] turns a repository root plus discovery settings
//! into an [`ImportGraph`]: one [`FileImports`] entry per selected file. A
//! file that cannot be read or parsed gets a `parse_error` instead of
//! aborting the scan.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::discovery::discover;
use super::imports::{extract_imports, ImportedModule};
use super::lexer::logical_lines;
use crate::error::Result;
use crate::policy::DiscoveryConfig;

/// Imports of a single scanned file.
///
/// A non-null `parse_error` means `imports` is empty and the file must be
/// skipped by rules, not treated as importing nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileImports {
    pub file_path: PathBuf,
    pub imports: Vec<ImportedModule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl FileImports {
    /// A successfully parsed file.
    pub fn parsed(file_path: impl Into<PathBuf>, imports: Vec<ImportedModule>) -> Self {
        Self {
            file_path: file_path.into(),
            imports,
            parse_error: None,
        }
    }

    /// A file whose imports could not be determined.
    pub fn failed(file_path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            imports: Vec::new(),
            parse_error: Some(message.into()),
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.parse_error.is_none()
    }

    /// Imported module paths in source order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|i| i.module.as_str())
    }
}

/// Map from scanned file path to its imports.
pub type ImportGraph = BTreeMap<PathBuf, FileImports>;

/// Builds [`ImportGraph`]s from a source tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportGraphScanner;

impl ImportGraphScanner {
    pub fn new() -> Self {
        Self
    }

    /// Select files under `root`; see [`discover`].
    pub fn discover(
        &self,
        root: &Path,
        include_globs: &[String],
        exclude_globs: &[String],
    ) -> Result<Vec<PathBuf>> {
        discover(root, include_globs, exclude_globs)
    }

    /// Read and parse one file. Never fails; problems land in `parse_error`.
    pub fn parse_file(&self, path: &Path) -> FileImports {
        match fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(source) => parse_source(path, &source),
                Err(e) => FileImports::failed(
                    path,
                    format!("file is not valid UTF-8: {}", e.utf8_error()),
                ),
            },
            Err(e) => FileImports::failed(path, format!("failed to read file: {}", e)),
        }
    }

    /// Discover and parse every selected file under `root`.
    pub fn build(&self, root: &Path, discovery: &DiscoveryConfig) -> Result<ImportGraph> {
        let files = self.discover(root, &discovery.effective_includes(), &discovery.exclude_globs)?;

        let mut graph = ImportGraph::new();
        for path in files {
            let file_imports = self.parse_file(&path);
            if let Some(error) = &file_imports.parse_error {
                debug!("Could not parse {}: {}", path.display(), error);
            }
            graph.insert(path, file_imports);
        }

        let failed = graph.values().filter(|f| !f.is_parsed()).count();
        info!(
            "Scanned {} file(s) under {} ({} with parse errors)",
            graph.len(),
            root.display(),
            failed
        );

        Ok(graph)
    }
}

/// Parse already-loaded source text.
pub fn parse_source(path: &Path, source: &str) -> FileImports {
    let result = logical_lines(source).and_then(|lines| extract_imports(&lines));
    match result {
        Ok(imports) => FileImports::parsed(path, imports),
        Err(e) => FileImports::failed(path, e.to_string()),
    }
}
