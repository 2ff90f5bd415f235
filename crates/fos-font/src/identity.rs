//! Normalized font identity used to synthesize `@font-face` rules

/// Weight range used when nothing better is known (full variable axis)
pub const DEFAULT_WEIGHT_RANGE: &str = "100 900";

/// Family, style and weight of one font, safe to splice into CSS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontIdentity {
    /// Family name, restricted to `[A-Za-z0-9-_]`
    pub family: String,
    /// Lower-cased style, `regular` is reported as `normal`
    pub style: String,
    /// CSS `font-weight` value
    pub weight: String,
}

impl FontIdentity {
    /// Build an identity from raw family and style strings.
    ///
    /// A missing family falls back to `fallback_family` (usually the file
    /// stem) and a missing style to `normal`. Returns `None` when a family or
    /// style is present but nothing of it survives sanitizing.
    pub fn normalize(
        family: Option<&str>,
        style: Option<&str>,
        fallback_family: &str,
    ) -> Option<Self> {
        let family = sanitize(family.unwrap_or(fallback_family));
        let style = style.map(normalize_style).unwrap_or_else(|| "normal".to_string());
        if family.is_empty() || style.is_empty() {
            return None;
        }

        Some(Self {
            family,
            style,
            weight: DEFAULT_WEIGHT_RANGE.to_string(),
        })
    }

    /// Override the weight, e.g. with `"700"` for a static bold face
    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        let weight = weight.into();
        if !weight.trim().is_empty() {
            self.weight = weight;
        }
        self
    }
}

/// Strip everything outside `[A-Za-z0-9-_]`
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Sanitize and lower-case a subfamily name
pub fn normalize_style(value: &str) -> String {
    let style = sanitize(value).to_ascii_lowercase();
    if style == "regular" {
        "normal".to_string()
    } else {
        style
    }
}
