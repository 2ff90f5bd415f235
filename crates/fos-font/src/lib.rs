//! fOS Font - Web font preparation primitives
//!
//! This crate holds the per-font steps of the fOS web font build:
//! - Font identity extraction (family, style, weight) for `@font-face`
//! - WOFF/WOFF2 unwrapping so identities can be read from subset output
//! - Unicode range selection and subsetter invocation
//!
//! The binary subsetting algorithm itself lives behind the [`Subsetter`]
//! trait and is supplied by the caller.

pub mod container;
pub mod identity;
pub mod metadata;
pub mod subset;

#[cfg(test)]
mod testing;

pub use identity::{FontIdentity, DEFAULT_WEIGHT_RANGE};
pub use metadata::{extract_identity, FontProperties, MetadataReader, NameProperty, TtfMetadataReader};
pub use subset::{subset_font, unicode_range, Flavor, SubsetError, SubsetRequest, Subsetter};

/// Font processing error types
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Failed to read font metadata: {0}")]
    Metadata(String),

    #[error("Malformed font container: {0}")]
    Container(String),
}

pub type Result<T> = std::result::Result<T, FontError>;
