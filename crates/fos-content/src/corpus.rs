//! Content corpus
//!
//! The corpus is built once per build and shared read-only by every font.
//! Unreadable files are skipped; only a missing root or a bad pattern fails.

use std::path::PathBuf;
use std::sync::Arc;

use crate::strip::strip_markup;
use crate::walk::FileWalker;
use crate::Result;

/// Which markup files to scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentScan {
    pub root: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl ContentScan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include: vec!["*.html".to_string()],
            exclude: Vec::new(),
        }
    }

    pub fn with_include(mut self, include: Vec<String>) -> Self {
        self.include = include;
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }
}

/// Visible text of all scanned markup, space separated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentCorpus {
    text: String,
}

impl ContentCorpus {
    /// Wrap already collected text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Scan the files selected by `scan` and collect their text
    pub async fn build(walker: Arc<dyn FileWalker>, scan: ContentScan) -> Result<Self> {
        let files = {
            let scan = scan.clone();
            smol::unblock(move || walker.walk(&scan.root, &scan.include, &scan.exclude)).await?
        };

        let mut parts = Vec::new();
        for file in &files {
            let bytes = match smol::fs::read(&file.path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Skipping unreadable content file {}: {}", file.path.display(), e);
                    continue;
                }
            };
            let markup = String::from_utf8_lossy(&bytes);
            match strip_markup(&markup) {
                Ok(text) if !text.is_empty() => {
                    tracing::debug!("Collected {} chars from {}", text.len(), file.relative.display());
                    parts.push(text);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping content file {}: {}", file.path.display(), e),
            }
        }

        tracing::info!(
            "Content scan of {}: {} files, {} with text",
            scan.root.display(),
            files.len(),
            parts.len()
        );
        Ok(Self::from_text(parts.join(" ")))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `None` when nothing was collected
    pub fn as_text(&self) -> Option<&str> {
        if self.text.is_empty() { None } else { Some(&self.text) }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
