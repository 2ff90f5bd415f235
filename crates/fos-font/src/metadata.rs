//! Font metadata reading
//!
//! A [`MetadataReader`] turns a font binary into a flat list of named
//! properties. [`extract_identity`] reduces that list to a [`FontIdentity`],
//! treating every failure as "no identity".

use ttf_parser::{name_id, Face};

use crate::container;
use crate::identity::FontIdentity;
use crate::{FontError, Result};

/// One named metadata entry, e.g. `font-family = "Inter"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameProperty {
    pub name: String,
    pub text: String,
}

impl NameProperty {
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
        }
    }
}

/// Metadata properties read from a font, in name-id order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontProperties {
    pub properties: Vec<NameProperty>,
}

impl FontProperties {
    /// First property whose name is one of `names`
    pub fn find(&self, names: &[&str]) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| names.contains(&p.name.as_str()))
            .map(|p| p.text.as_str())
    }
}

/// Source of font metadata.
///
/// Implementations return an error for malformed or unsupported fonts.
pub trait MetadataReader: Send + Sync {
    fn read_metadata(&self, data: &[u8]) -> Result<FontProperties>;
}

/// Reads the OpenType `name` table with ttf-parser.
///
/// WOFF and WOFF2 input is unwrapped to sfnt first.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtfMetadataReader;

impl TtfMetadataReader {
    pub fn new() -> Self {
        Self
    }
}

/// Property names for the `name` table ids we expose
fn property_name(id: u16) -> Option<&'static str> {
    Some(match id {
        name_id::COPYRIGHT_NOTICE => "copyright",
        name_id::FAMILY => "font-family",
        name_id::SUBFAMILY => "font-subfamily",
        name_id::UNIQUE_ID => "unique-id",
        name_id::FULL_NAME => "name",
        name_id::VERSION => "version",
        name_id::POST_SCRIPT_NAME => "postscript-name",
        name_id::TRADEMARK => "trademark",
        name_id::MANUFACTURER => "manufacturer",
        name_id::DESIGNER => "designer",
        name_id::DESCRIPTION => "description",
        name_id::LICENSE => "license",
        name_id::TYPOGRAPHIC_FAMILY => "typographic-family",
        name_id::TYPOGRAPHIC_SUBFAMILY => "typographic-subfamily",
        _ => return None,
    })
}

impl MetadataReader for TtfMetadataReader {
    fn read_metadata(&self, data: &[u8]) -> Result<FontProperties> {
        let sfnt = container::to_sfnt(data)?;
        let face = Face::parse(&sfnt, 0).map_err(|e| FontError::Metadata(e.to_string()))?;

        let mut found: Vec<(u16, NameProperty)> = Vec::new();
        for name in face.names() {
            let Some(prop) = property_name(name.name_id) else {
                continue;
            };
            // Keep the first decodable record per id
            if found.iter().any(|(id, _)| *id == name.name_id) {
                continue;
            }
            if let Some(text) = name.to_string() {
                found.push((name.name_id, NameProperty::new(prop, &text)));
            }
        }
        found.sort_by_key(|(id, _)| *id);

        Ok(FontProperties {
            properties: found.into_iter().map(|(_, p)| p).collect(),
        })
    }
}

/// Extract a normalized identity from a font buffer.
///
/// `fallback_family` is used when the font carries no family name. Reader
/// failures are reported as `None`.
pub fn extract_identity(
    reader: &dyn MetadataReader,
    data: &[u8],
    fallback_family: &str,
) -> Option<FontIdentity> {
    let props = match reader.read_metadata(data) {
        Ok(props) => props,
        Err(e) => {
            tracing::debug!("No font identity for {}: {}", fallback_family, e);
            return None;
        }
    };

    let identity = FontIdentity::normalize(
        props.find(&["name", "font-family"]),
        props.find(&["font-subfamily"]),
        fallback_family,
    );
    if identity.is_none() {
        tracing::debug!("Font {} has no usable family name", fallback_family);
    }
    identity
}
