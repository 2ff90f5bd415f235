//! Artifact output

use std::fs;
use std::io;
use std::path::PathBuf;

/// A file the build wants written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub destination_path: PathBuf,
    pub contents: Vec<u8>,
}

impl Artifact {
    pub fn new(destination_path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            destination_path: destination_path.into(),
            contents: contents.into(),
        }
    }
}

/// Persists build artifacts
pub trait ArtifactWriter: Send + Sync {
    fn write(&self, artifacts: &[Artifact]) -> io::Result<()>;
}

/// Writes artifacts to disk, creating parent directories
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWriter;

impl ArtifactWriter for FsWriter {
    fn write(&self, artifacts: &[Artifact]) -> io::Result<()> {
        for artifact in artifacts {
            if let Some(parent) = artifact.destination_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&artifact.destination_path, &artifact.contents)?;
            tracing::debug!("Wrote {} ({} bytes)", artifact.destination_path.display(), artifact.contents.len());
        }
        Ok(())
    }
}
