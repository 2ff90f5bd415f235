//! Font assets and per-font results

use std::path::{Path, PathBuf};

use fos_font::{Flavor, FontIdentity, SubsetError};

/// One input font and where its output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAsset {
    pub source_path: PathBuf,
    /// Source path relative to the source root
    pub relative_path: PathBuf,
    /// Output file name, e.g. `Inter-Regular.woff2`
    pub filename: String,
    /// Output path under the destination root
    pub destination_path: PathBuf,
}

impl FontAsset {
    /// Place `source_path` under `dest_root`, keeping its directory below `source_root`
    pub fn new(source_root: &Path, dest_root: &Path, source_path: &Path, flavor: Flavor) -> Self {
        let relative_path = source_path
            .strip_prefix(source_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(source_path.file_name().unwrap_or_default()));

        let filename = format!("{}.{}", file_stem(source_path), flavor.extension());
        let destination_path = match relative_path.parent() {
            Some(dir) => dest_root.join(dir).join(&filename),
            None => dest_root.join(&filename),
        };

        Self {
            source_path: source_path.to_path_buf(),
            relative_path,
            filename,
            destination_path,
        }
    }

    /// Source file name without extension
    pub fn stem(&self) -> String {
        file_stem(&self.source_path)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Why a font produced no output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFailure {
    pub kind: String,
    pub message: String,
    pub trace: Option<String>,
}

impl BuildFailure {
    /// The source font could not be read
    pub fn read(error: &std::io::Error) -> Self {
        Self {
            kind: "ReadError".to_string(),
            message: error.to_string(),
            trace: None,
        }
    }
}

impl From<SubsetError> for BuildFailure {
    fn from(error: SubsetError) -> Self {
        Self {
            kind: error.kind,
            message: error.message,
            trace: error.trace,
        }
    }
}

/// A successfully subsetted font
#[derive(Debug, Clone)]
pub struct CompiledFont {
    pub asset: FontAsset,
    pub contents: Vec<u8>,
    /// Present only when embedding was requested and metadata was usable
    pub identity: Option<FontIdentity>,
}

/// A font that failed
#[derive(Debug, Clone)]
pub struct FailedFont {
    pub source_path: PathBuf,
    pub error: BuildFailure,
}

/// Outcome of processing one font
#[derive(Debug, Clone)]
pub enum FontResult {
    Compiled(CompiledFont),
    Failed(FailedFont),
}

impl FontResult {
    pub fn source_path(&self) -> &Path {
        match self {
            FontResult::Compiled(font) => &font.asset.source_path,
            FontResult::Failed(failed) => &failed.source_path,
        }
    }

    pub fn error(&self) -> Option<&BuildFailure> {
        match self {
            FontResult::Compiled(_) => None,
            FontResult::Failed(failed) => Some(&failed.error),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, FontResult::Compiled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_paths() {
        let asset = FontAsset::new(
            Path::new("/src/fonts"),
            Path::new("/dist"),
            Path::new("/src/fonts/inter/Inter-Regular.ttf"),
            Flavor::Woff2,
        );
        assert_eq!(asset.relative_path, PathBuf::from("inter/Inter-Regular.ttf"));
        assert_eq!(asset.filename, "Inter-Regular.woff2");
        assert_eq!(asset.destination_path, PathBuf::from("/dist/inter/Inter-Regular.woff2"));
        assert_eq!(asset.stem(), "Inter-Regular");
    }

    #[test]
    fn test_asset_outside_source_root() {
        let asset = FontAsset::new(
            Path::new("/src/fonts"),
            Path::new("/dist"),
            Path::new("/elsewhere/Mono.otf"),
            Flavor::Woff,
        );
        assert_eq!(asset.relative_path, PathBuf::from("Mono.otf"));
        assert_eq!(asset.destination_path, PathBuf::from("/dist/Mono.woff"));
    }

    #[test]
    fn test_failure_from_subset_error() {
        let failure = BuildFailure::from(SubsetError::new("TTLibError", "bad sfnt").with_trace("trace"));
        assert_eq!(failure.kind, "TTLibError");
        assert_eq!(failure.message, "bad sfnt");
        assert_eq!(failure.trace.as_deref(), Some("trace"));
    }
}
