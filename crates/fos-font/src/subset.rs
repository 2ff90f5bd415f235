//! Subset invocation
//!
//! Decides which code points a font keeps and hands the work to a
//! [`Subsetter`]. Failures come back as [`SubsetError`] values so the
//! caller can record them per font.

use std::fmt;

/// Always kept: Basic Latin
pub const ASCII_RANGE: &str = "U+0000-007F";

/// Kept when no content text is known: Latin-1 Supplement
pub const LATIN1_RANGE: &str = "U+00A0-00FF";

/// Output container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    #[default]
    Woff2,
    Woff,
    TrueType,
    OpenType,
}

impl Flavor {
    /// Parse an `outputType` value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "woff2" => Some(Flavor::Woff2),
            "woff" => Some(Flavor::Woff),
            "ttf" | "truetype" => Some(Flavor::TrueType),
            "otf" | "opentype" => Some(Flavor::OpenType),
            _ => None,
        }
    }

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Flavor::Woff2 => "woff2",
            Flavor::Woff => "woff",
            Flavor::TrueType => "ttf",
            Flavor::OpenType => "otf",
        }
    }

    /// MIME type used in data URIs
    pub fn mime_type(&self) -> &'static str {
        match self {
            Flavor::Woff2 => "font/woff2",
            Flavor::Woff => "font/woff",
            Flavor::TrueType => "font/ttf",
            Flavor::OpenType => "font/otf",
        }
    }

    /// Value for the CSS `format()` hint
    pub fn css_format(&self) -> &'static str {
        match self {
            Flavor::Woff2 => "woff2",
            Flavor::Woff => "woff",
            Flavor::TrueType => "truetype",
            Flavor::OpenType => "opentype",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Options handed to the subsetter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetRequest {
    /// Comma separated `U+XXXX-YYYY` ranges
    pub unicodes: String,
    /// Exact characters to keep in addition to `unicodes`
    pub text: Option<String>,
    pub flavor: Flavor,
}

impl SubsetRequest {
    /// Compute the request for one font.
    ///
    /// `text` is the effective content text for the build, if any.
    /// `unicodes` and `flavor` are explicit overrides.
    pub fn new(text: Option<&str>, unicodes: Option<&str>, flavor: Option<Flavor>) -> Self {
        let text = text.filter(|t| !t.is_empty()).map(str::to_string);
        let unicodes = match unicodes.filter(|u| !u.trim().is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => unicode_range(text.is_some()),
        };

        Self {
            unicodes,
            text,
            flavor: flavor.unwrap_or_default(),
        }
    }
}

/// Default unicode range for a build with or without content text
pub fn unicode_range(has_text: bool) -> String {
    if has_text {
        ASCII_RANGE.to_string()
    } else {
        format!("{},{}", ASCII_RANGE, LATIN1_RANGE)
    }
}

/// Failure reported by a subsetter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SubsetError {
    /// Failure class, e.g. `TTLibError`
    pub kind: String,
    pub message: String,
    /// Diagnostic trace from the subsetter, if it has one
    pub trace: Option<String>,
}

impl SubsetError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }
}

/// Binary font subsetting backend
pub trait Subsetter: Send + Sync {
    fn subset(&self, input: &[u8], request: &SubsetRequest) -> Result<Vec<u8>, SubsetError>;
}

/// Run `subsetter` over one font
pub fn subset_font(
    subsetter: &dyn Subsetter,
    input: &[u8],
    request: &SubsetRequest,
) -> Result<Vec<u8>, SubsetError> {
    tracing::debug!(
        "Subsetting {} bytes to {} ({}, text: {})",
        input.len(),
        request.flavor,
        request.unicodes,
        request.text.as_ref().map_or(0, |t| t.chars().count()),
    );
    let output = subsetter.subset(input, request)?;
    tracing::debug!("Subset produced {} bytes", output.len());
    Ok(output)
}
