//! Source file discovery.
//!
//! Walks a repository root and selects files whose root-relative,
//! `/`-separated path matches an include glob and no exclude glob.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PolicyError, Result};

/// Discover files under `root`, sorted lexically by relative path.
///
/// `*` never crosses a directory separator; use `**` for that.
///
/// # Errors
///
/// Returns `FileNotFound` if `root` does not exist and `ConfigParseError`
/// if a glob is malformed.
pub fn discover(
    root: &Path,
    include_globs: &[String],
    exclude_globs: &[String],
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(PolicyError::FileNotFound {
            path: root.to_path_buf(),
        });
    }

    let includes = compile_globset(root, include_globs)?;
    let excludes = compile_globset(root, exclude_globs)?;

    let mut matched: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = relative_path(root, entry.path());
        if includes.is_match(&relative) && !excludes.is_match(&relative) {
            matched.push((relative, entry.into_path()));
        }
    }

    matched.sort_by(|a, b| a.0.cmp(&b.0));
    debug!(
        "Discovered {} file(s) under {}",
        matched.len(),
        root.display()
    );

    Ok(matched.into_iter().map(|(_, path)| path).collect())
}

/// Root-relative path with `/` separators, used for glob matching and reporting.
pub fn relative_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    }
}

fn compile_globset(root: &Path, globs: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let compiled = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .map_err(|e| PolicyError::parse(root, format!("invalid glob {glob:?}: {e}")))?;
        builder.add(compiled);
    }
    builder
        .build()
        .map_err(|e| PolicyError::parse(root, format!("invalid glob set: {e}")))
}
