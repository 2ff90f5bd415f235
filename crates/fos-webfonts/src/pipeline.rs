//! Web font build pipeline
//!
//! 1. Scan content once (if configured)
//! 2. Subset every font, `concurrency` at a time
//! 3. Extract identities from the outputs and record `@font-face` rules
//! 4. Hand font outputs and the stylesheet to the writer
//!
//! A failing font becomes a [`FontResult::Failed`] and never stops the build.
//! Results and stylesheet rules follow input order regardless of which task
//! finishes first.

use std::path::PathBuf;
use std::sync::Arc;

use fos_content::{ContentCorpus, FileWalker, GlobWalker};
use fos_font::{
    extract_identity, subset_font, Flavor, MetadataReader, SubsetRequest, Subsetter, TtfMetadataReader,
};
use smol::lock::Semaphore;

use crate::asset::{BuildFailure, CompiledFont, FailedFont, FontAsset, FontResult};
use crate::config::BuildConfig;
use crate::registry::{EmbeddedFontEntry, EmbeddingRegistry};
use crate::writer::{Artifact, ArtifactWriter, FsWriter};
use crate::{BuildError, Result};

/// Everything one build produced
#[derive(Debug)]
pub struct BuildReport {
    /// One entry per input font, in input order
    pub results: Vec<FontResult>,
    /// The embedded stylesheet, if one was written
    pub stylesheet: Option<Artifact>,
}

impl BuildReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &CompiledFont> {
        self.results.iter().filter_map(|r| match r {
            FontResult::Compiled(font) => Some(font),
            FontResult::Failed(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = &FailedFont> {
        self.results.iter().filter_map(|r| match r {
            FontResult::Compiled(_) => None,
            FontResult::Failed(failed) => Some(failed),
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Coordinates one web font build
pub struct FontPipeline {
    config: BuildConfig,
    flavor: Flavor,
    source_root: PathBuf,
    dest_root: PathBuf,
    walker: Arc<dyn FileWalker>,
    subsetter: Arc<dyn Subsetter>,
    metadata: Arc<dyn MetadataReader>,
    writer: Arc<dyn ArtifactWriter>,
}

impl FontPipeline {
    /// Create a pipeline using the glob walker, ttf-parser metadata and disk output
    pub fn new(
        config: BuildConfig,
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        subsetter: Arc<dyn Subsetter>,
    ) -> Result<Self> {
        config.validate()?;
        let flavor = config.flavor()?.unwrap_or_default();

        Ok(Self {
            config,
            flavor,
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            walker: Arc::new(GlobWalker),
            subsetter,
            metadata: Arc::new(TtfMetadataReader),
            writer: Arc::new(FsWriter),
        })
    }

    pub fn with_walker(mut self, walker: Arc<dyn FileWalker>) -> Self {
        self.walker = walker;
        self
    }

    pub fn with_metadata_reader(mut self, metadata: Arc<dyn MetadataReader>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn ArtifactWriter>) -> Self {
        self.writer = writer;
        self
    }

    /// Build every font under the source root matching the configured patterns
    pub async fn run(&self) -> Result<BuildReport> {
        let inputs = {
            let walker = self.walker.clone();
            let root = self.source_root.clone();
            let include = self.config.include.clone();
            let exclude = self.config.exclude.clone();
            smol::unblock(move || walker.walk(&root, &include, &exclude)).await?
        };
        self.run_inputs(inputs.into_iter().map(|f| f.path).collect()).await
    }

    /// Blocking wrapper around [`FontPipeline::run`]
    pub fn run_blocking(&self) -> Result<BuildReport> {
        smol::block_on(self.run())
    }

    /// Build the given font files
    pub async fn run_inputs(&self, inputs: Vec<PathBuf>) -> Result<BuildReport> {
        tracing::info!("Building {} fonts into {}", inputs.len(), self.dest_root.display());

        let text = self.content_text().await?;
        let request = Arc::new(SubsetRequest::new(
            text.as_deref(),
            self.config.unicodes.as_deref(),
            Some(self.flavor),
        ));

        let results = self.process_all(inputs, request).await;

        let registry = EmbeddingRegistry::new();
        let mut artifacts = Vec::new();
        for result in &results {
            let FontResult::Compiled(font) = result else {
                continue;
            };
            if let Some(identity) = &font.identity {
                registry.record(&EmbeddedFontEntry::new(identity, &font.contents, self.flavor));
            }
            artifacts.push(Artifact::new(&font.asset.destination_path, font.contents.clone()));
        }

        let stylesheet = self
            .config
            .stylesheet_path(&self.dest_root)
            .zip(registry.flush())
            .map(|(path, css)| Artifact::new(path, css));
        if let Some(stylesheet) = &stylesheet {
            tracing::info!(
                "Embedding {} fonts into {}",
                registry.len(),
                stylesheet.destination_path.display()
            );
            artifacts.push(stylesheet.clone());
        }

        if !artifacts.is_empty() {
            let writer = self.writer.clone();
            smol::unblock(move || writer.write(&artifacts))
                .await
                .map_err(BuildError::Write)?;
        }

        let report = BuildReport { results, stylesheet };
        tracing::info!(
            "Font build finished: {} compiled, {} failed",
            report.succeeded().count(),
            report.failed().count()
        );
        Ok(report)
    }

    /// Literal `text` wins over scanned content; `None` means no text is known
    async fn content_text(&self) -> Result<Option<String>> {
        if let Some(text) = self.config.text.as_ref().filter(|t| !t.is_empty()) {
            tracing::debug!("Using configured text ({} chars)", text.chars().count());
            return Ok(Some(text.clone()));
        }

        let cwd = std::env::current_dir().unwrap_or_default();
        let Some(scan) = self.config.content_scan(&self.source_root, &cwd) else {
            return Ok(None);
        };

        let corpus = ContentCorpus::build(self.walker.clone(), scan).await?;
        Ok(corpus.as_text().map(str::to_string))
    }

    async fn process_all(&self, inputs: Vec<PathBuf>, request: Arc<SubsetRequest>) -> Vec<FontResult> {
        let permits = Arc::new(Semaphore::new(self.config.concurrency.max(1)));

        let tasks: Vec<_> = inputs
            .into_iter()
            .map(|source| {
                let job = FontJob {
                    asset: FontAsset::new(&self.source_root, &self.dest_root, &source, self.flavor),
                    request: request.clone(),
                    subsetter: self.subsetter.clone(),
                    metadata: self.config.embeds().then(|| self.metadata.clone()),
                };
                let permits = permits.clone();
                smol::spawn(async move {
                    let _permit = permits.acquire_arc().await;
                    job.run().await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(task.await);
        }
        results
    }
}

/// Work for a single font
struct FontJob {
    asset: FontAsset,
    request: Arc<SubsetRequest>,
    subsetter: Arc<dyn Subsetter>,
    /// Set when embedding is on
    metadata: Option<Arc<dyn MetadataReader>>,
}

impl FontJob {
    async fn run(self) -> FontResult {
        let FontJob { asset, request, subsetter, metadata } = self;

        let input = match smol::fs::read(&asset.source_path).await {
            Ok(input) => input,
            Err(e) => return fail(asset.source_path, BuildFailure::read(&e)),
        };

        let fallback = asset.stem();
        let outcome = smol::unblock(move || {
            let contents = subset_font(&*subsetter, &input, &request)?;
            let identity = metadata.and_then(|reader| extract_identity(&*reader, &contents, &fallback));
            Ok::<_, fos_font::SubsetError>((contents, identity))
        })
        .await;

        match outcome {
            Ok((contents, identity)) => {
                tracing::debug!("Compiled {} -> {}", asset.source_path.display(), asset.destination_path.display());
                FontResult::Compiled(CompiledFont { asset, contents, identity })
            }
            Err(e) => fail(asset.source_path, e.into()),
        }
    }
}

fn fail(source_path: PathBuf, error: BuildFailure) -> FontResult {
    tracing::warn!("Font {} failed: {}: {}", source_path.display(), error.kind, error.message);
    FontResult::Failed(FailedFont { source_path, error })
}
