//! fOS Content - Markup scanning for font subsetting
//!
//! Collects the visible text of a site's markup so web fonts can be cut
//! down to the characters that are actually used.

mod corpus;
mod strip;
pub mod walk;

pub use corpus::{ContentCorpus, ContentScan};
pub use strip::strip_markup;
pub use walk::{FileWalker, GlobWalker, WalkedFile};

use std::path::PathBuf;

/// Content scanning error
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Content root does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("Invalid file pattern: {0}")]
    Pattern(String),

    #[error("Failed to parse markup: {0}")]
    Markup(String),
}

pub type Result<T> = std::result::Result<T, ContentError>;
