//! Embedded `@font-face` collection

use std::fmt;
use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fos_font::{Flavor, FontIdentity};

/// One `@font-face` rule with the font inlined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedFontEntry {
    pub family: String,
    pub style: String,
    pub weight: String,
    pub flavor: Flavor,
    /// Base64 of the font binary
    pub data: String,
}

impl EmbeddedFontEntry {
    pub fn new(identity: &FontIdentity, contents: &[u8], flavor: Flavor) -> Self {
        Self {
            family: identity.family.clone(),
            style: identity.style.clone(),
            weight: identity.weight.clone(),
            flavor,
            data: STANDARD.encode(contents),
        }
    }
}

impl fmt::Display for EmbeddedFontEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@font-face {{font-family: '{}';font-style: {};font-weight: {};src: url('data:{};charset=utf-8;base64,{}') format('{}');}}",
            self.family,
            self.style,
            self.weight,
            self.flavor.mime_type(),
            self.data,
            self.flavor.css_format(),
        )
    }
}

/// Ordered, append-only list of `@font-face` rules for one build.
///
/// Duplicates are kept. Safe to append from several tasks.
#[derive(Debug, Default)]
pub struct EmbeddingRegistry {
    entries: Mutex<Vec<String>>,
}

impl EmbeddingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: &EmbeddedFontEntry) {
        self.lock().push(entry.to_string());
    }

    /// All rules joined by a space, `None` if nothing was recorded.
    ///
    /// Does not clear the registry.
    pub fn flush(&self) -> Option<String> {
        let entries = self.lock();
        if entries.is_empty() {
            None
        } else {
            Some(entries.join(" "))
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(family: &str, style: &str) -> FontIdentity {
        FontIdentity::normalize(Some(family), Some(style), "").unwrap()
    }

    #[test]
    fn test_entry_format() {
        let entry = EmbeddedFontEntry::new(&identity("Inter", "Regular"), b"abc", Flavor::Woff2);
        assert_eq!(
            entry.to_string(),
            "@font-face {font-family: 'Inter';font-style: normal;font-weight: 100 900;\
             src: url('data:font/woff2;charset=utf-8;base64,YWJj') format('woff2');}"
        );
    }

    #[test]
    fn test_entry_follows_flavor() {
        let entry = EmbeddedFontEntry::new(&identity("Mono", "Italic"), b"", Flavor::TrueType);
        let css = entry.to_string();
        assert!(css.contains("data:font/ttf;charset=utf-8;base64,')"));
        assert!(css.ends_with("format('truetype');}"));
    }

    #[test]
    fn test_empty_flush() {
        let registry = EmbeddingRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.flush(), None);
    }

    #[test]
    fn test_flush_keeps_order_and_duplicates() {
        let registry = EmbeddingRegistry::new();
        let a = EmbeddedFontEntry::new(&identity("A", "Regular"), b"a", Flavor::Woff2);
        let b = EmbeddedFontEntry::new(&identity("B", "Bold"), b"b", Flavor::Woff2);
        registry.record(&a);
        registry.record(&b);
        registry.record(&a);

        let css = registry.flush().unwrap();
        assert_eq!(css, format!("{a} {b} {a}"));
        // flush is not destructive
        assert_eq!(registry.len(), 3);

        registry.clear();
        assert_eq!(registry.flush(), None);
    }
}
