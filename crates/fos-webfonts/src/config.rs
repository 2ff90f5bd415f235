//! Build configuration

use std::path::{Path, PathBuf};

use fos_content::ContentScan;
use fos_font::Flavor;
use serde::Deserialize;

use crate::{BuildError, Result};

/// File name used when `embedded` names a directory
pub const DEFAULT_STYLESHEET_NAME: &str = "compiled-fonts.fonts.css";

/// Content scanning options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompileContent {
    /// Markup root, see [`BuildConfig::content_scan`]
    pub source: Option<PathBuf>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
}

/// `compileContent` accepts `true` or an options object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CompileContentSetting {
    Enabled(bool),
    Options(CompileContent),
}

/// Web font build configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// Scan markup to restrict glyph coverage
    pub compile_content: Option<CompileContentSetting>,
    /// Stylesheet path; enables embedding
    pub embedded: Option<PathBuf>,
    /// Literal text to keep; replaces the scanned content
    pub text: Option<String>,
    /// Explicit unicode ranges
    pub unicodes: Option<String>,
    /// Output flavor (`woff2`, `woff`, `ttf`, `otf`)
    pub output_type: Option<String>,
    /// Font file patterns
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Fonts processed at once
    pub concurrency: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compile_content: None,
            embedded: None,
            text: None,
            unicodes: None,
            output_type: None,
            include: ["*.ttf", "*.woff", "*.otf", "*.eot", "*.svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: Vec::new(),
            concurrency: 4,
        }
    }
}

impl BuildConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| BuildError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.flavor()?;
        if self.concurrency == 0 {
            return Err(BuildError::Config("concurrency must be at least 1".into()));
        }
        Ok(())
    }

    /// Explicit output flavor, if configured
    pub fn flavor(&self) -> Result<Option<Flavor>> {
        match &self.output_type {
            None => Ok(None),
            Some(value) => Flavor::parse(value)
                .map(Some)
                .ok_or_else(|| BuildError::Config(format!("unknown outputType: {value}"))),
        }
    }

    /// Content scan options, `None` when scanning is off
    pub fn compile_content(&self) -> Option<CompileContent> {
        match &self.compile_content {
            Some(CompileContentSetting::Enabled(true)) => Some(CompileContent::default()),
            Some(CompileContentSetting::Options(options)) => Some(options.clone()),
            Some(CompileContentSetting::Enabled(false)) | None => None,
        }
    }

    pub fn embeds(&self) -> bool {
        self.embedded.is_some()
    }

    /// Resolve the content scan for a build rooted at `source_root`.
    ///
    /// A relative `source` starting with `.` is taken from `cwd`; any other
    /// `source` is joined onto `source_root`.
    pub fn content_scan(&self, source_root: &Path, cwd: &Path) -> Option<ContentScan> {
        let options = self.compile_content()?;

        let root = match &options.source {
            None => source_root.to_path_buf(),
            Some(source) if source.is_relative() && starts_with_dot(source) => cwd.join(source),
            Some(source) => source_root.join(source),
        };

        let mut scan = ContentScan::new(root);
        if let Some(include) = options.include {
            scan = scan.with_include(include);
        }
        let exclude: Vec<String> = options
            .exclude
            .into_iter()
            .chain(options.ignore)
            .flatten()
            .collect();
        Some(scan.with_exclude(exclude))
    }

    /// Where the embedded stylesheet goes, `None` when embedding is off
    pub fn stylesheet_path(&self, dest_root: &Path) -> Option<PathBuf> {
        let embedded = self.embedded.as_ref()?;
        let path = dest_root.join(embedded);
        if embedded.extension().is_some() {
            Some(path)
        } else {
            Some(path.join(DEFAULT_STYLESHEET_NAME))
        }
    }
}

fn starts_with_dot(path: &Path) -> bool {
    path.to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::from_json("{}").unwrap();
        assert_eq!(config, BuildConfig::default());
        assert_eq!(config.include.len(), 5);
        assert!(config.compile_content().is_none());
        assert!(!config.embeds());
        assert_eq!(config.flavor().unwrap(), None);
    }

    #[test]
    fn test_full_config() {
        let config = BuildConfig::from_json(
            r#"{
                "compileContent": { "source": "pages", "include": ["*.htm"], "exclude": ["a/*"], "ignore": ["b/*"] },
                "embedded": "css/fonts.css",
                "text": "abc",
                "unicodes": "U+0041",
                "outputType": "woff",
                "concurrency": 2
            }"#,
        )
        .unwrap();

        assert_eq!(config.flavor().unwrap(), Some(Flavor::Woff));
        assert_eq!(config.text.as_deref(), Some("abc"));
        assert_eq!(config.concurrency, 2);

        let scan = config.content_scan(Path::new("/site"), Path::new("/cwd")).unwrap();
        assert_eq!(scan.root, PathBuf::from("/site/pages"));
        assert_eq!(scan.include, ["*.htm"]);
        assert_eq!(scan.exclude, ["a/*", "b/*"]);
    }

    #[test]
    fn test_compile_content_flag() {
        let on = BuildConfig::from_json(r#"{ "compileContent": true }"#).unwrap();
        let scan = on.content_scan(Path::new("/site"), Path::new("/cwd")).unwrap();
        assert_eq!(scan.root, PathBuf::from("/site"));
        assert_eq!(scan.include, ["*.html"]);

        let off = BuildConfig::from_json(r#"{ "compileContent": false }"#).unwrap();
        assert!(off.content_scan(Path::new("/site"), Path::new("/cwd")).is_none());
    }

    #[test]
    fn test_dot_relative_source_uses_cwd() {
        let config = BuildConfig::from_json(r#"{ "compileContent": { "source": "./public" } }"#).unwrap();
        let scan = config.content_scan(Path::new("/site"), Path::new("/cwd")).unwrap();
        assert_eq!(scan.root, PathBuf::from("/cwd/./public"));
    }

    #[test]
    fn test_absolute_source() {
        let config = BuildConfig::from_json(r#"{ "compileContent": { "source": "/www" } }"#).unwrap();
        let scan = config.content_scan(Path::new("/site"), Path::new("/cwd")).unwrap();
        assert_eq!(scan.root, PathBuf::from("/www"));
    }

    #[test]
    fn test_stylesheet_path() {
        let file = BuildConfig { embedded: Some("css/fonts.css".into()), ..Default::default() };
        assert_eq!(file.stylesheet_path(Path::new("/dist")), Some(PathBuf::from("/dist/css/fonts.css")));

        let dir = BuildConfig { embedded: Some("css".into()), ..Default::default() };
        assert_eq!(
            dir.stylesheet_path(Path::new("/dist")),
            Some(PathBuf::from("/dist/css/compiled-fonts.fonts.css"))
        );

        assert_eq!(BuildConfig::default().stylesheet_path(Path::new("/dist")), None);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(BuildConfig::from_json(r#"{ "outputType": "eot" }"#), Err(BuildError::Config(_))));
        assert!(matches!(BuildConfig::from_json(r#"{ "concurrency": 0 }"#), Err(BuildError::Config(_))));
        assert!(matches!(BuildConfig::from_json("not json"), Err(BuildError::Config(_))));
    }
}
