//! File discovery
//!
//! The pipeline only needs "files under a root matching some patterns".
//! [`GlobWalker`] provides that on top of the `glob` crate.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::{ContentError, Result};

/// A file found by a walker
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WalkedFile {
    /// Full path
    pub path: PathBuf,
    /// Path relative to the walk root
    pub relative: PathBuf,
}

impl WalkedFile {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative = path.strip_prefix(root).map(Path::to_path_buf).unwrap_or_else(|_| path.clone());
        Self { path, relative }
    }
}

/// Directory traversal with include/exclude patterns.
///
/// Include patterns are matched at any depth below `root`. Exclude patterns
/// are checked against both the relative path and the file name.
pub trait FileWalker: Send + Sync {
    fn walk(&self, root: &Path, include: &[String], exclude: &[String]) -> Result<Vec<WalkedFile>>;
}

/// Glob-based walker, results sorted by path
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobWalker;

impl GlobWalker {
    pub fn new() -> Self {
        Self
    }
}

impl FileWalker for GlobWalker {
    fn walk(&self, root: &Path, include: &[String], exclude: &[String]) -> Result<Vec<WalkedFile>> {
        if !root.is_dir() {
            return Err(ContentError::RootNotFound(root.to_path_buf()));
        }

        let excluded = exclude
            .iter()
            .map(|p| Pattern::new(p).map_err(|e| ContentError::Pattern(format!("{p}: {e}"))))
            .collect::<Result<Vec<_>>>()?;

        let base = Pattern::escape(&root.to_string_lossy());
        let mut found = BTreeSet::new();

        for pattern in include {
            let full = format!("{}/**/{}", base.trim_end_matches('/'), pattern);
            let paths = glob::glob(&full).map_err(|e| ContentError::Pattern(format!("{pattern}: {e}")))?;

            for entry in paths {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable path: {}", e);
                        continue;
                    }
                };
                if !path.is_file() {
                    continue;
                }
                let file = WalkedFile::new(root, path);
                if is_excluded(&excluded, &file.relative) {
                    continue;
                }
                found.insert(file);
            }
        }

        tracing::debug!("Walked {}: {} files", root.display(), found.len());
        Ok(found.into_iter().collect())
    }
}

fn is_excluded(patterns: &[Pattern], relative: &Path) -> bool {
    patterns.iter().any(|p| {
        p.matches_path(relative)
            || relative
                .file_name()
                .is_some_and(|name| p.matches(&name.to_string_lossy()))
    })
}
