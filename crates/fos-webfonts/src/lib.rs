//! fOS Web Fonts
//!
//! Build step that turns source fonts into subsetted web fonts and,
//! optionally, one stylesheet with every font inlined as a data URI.
//!
//! # Example
//! ```rust,ignore
//! use fos_webfonts::{BuildConfig, FontPipeline};
//!
//! let config = BuildConfig::from_json(r#"{ "compileContent": true, "embedded": "css" }"#)?;
//! let pipeline = FontPipeline::new(config, "src/fonts", "dist/fonts", subsetter)?;
//! let report = pipeline.run_blocking()?;
//! for failure in report.failed() {
//!     eprintln!("{}: {}", failure.source_path.display(), failure.error.message);
//! }
//! ```

mod asset;
mod config;
mod pipeline;
mod registry;
mod writer;

pub use asset::{BuildFailure, CompiledFont, FailedFont, FontAsset, FontResult};
pub use config::{BuildConfig, CompileContent, CompileContentSetting, DEFAULT_STYLESHEET_NAME};
pub use pipeline::{BuildReport, FontPipeline};
pub use registry::{EmbeddedFontEntry, EmbeddingRegistry};
pub use writer::{Artifact, ArtifactWriter, FsWriter};

// Re-export sub-crates for collaborator implementations
pub use fos_content as content;
pub use fos_font as font;

/// Build-wide error. Per-font problems are reported as [`BuildFailure`] instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Content scan failed: {0}")]
    Content(#[from] fos_content::ContentError),

    #[error("Failed to write artifacts: {0}")]
    Write(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BuildError>;
