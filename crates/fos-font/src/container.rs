//! WOFF and WOFF2 container unwrapping
//!
//! Subsetters usually emit compressed web font containers, while the `name`
//! table reader needs plain sfnt data. [`to_sfnt`] rebuilds an sfnt from:
//! - WOFF1: zlib-compressed tables, rebuilt in full
//! - WOFF2: one brotli stream; tables stored with a transform (`glyf`,
//!   `loca`, transformed `hmtx`) are left out, everything else is kept
//!
//! The WOFF2 result is enough to read names and header tables, not to
//! render glyphs.

use std::borrow::Cow;
use std::io::Read;

use crate::{FontError, Result};

/// WOFF signature 'wOFF'
const WOFF_SIGNATURE: u32 = 0x774F_4646;

/// WOFF2 signature 'wOF2'
const WOFF2_SIGNATURE: u32 = 0x774F_4632;

const WOFF_HEADER_LEN: usize = 44;
const WOFF2_HEADER_LEN: usize = 48;

/// Known table tags in WOFF2 (flag index -> tag)
const KNOWN_TAGS: [[u8; 4]; 63] = [
    *b"cmap", *b"head", *b"hhea", *b"hmtx", *b"maxp", *b"name", *b"OS/2", *b"post",
    *b"cvt ", *b"fpgm", *b"glyf", *b"loca", *b"prep", *b"CFF ", *b"VORG", *b"EBDT",
    *b"EBLC", *b"gasp", *b"hdmx", *b"kern", *b"LTSH", *b"PCLT", *b"VDMX", *b"vhea",
    *b"vmtx", *b"BASE", *b"GDEF", *b"GPOS", *b"GSUB", *b"EBSC", *b"JSTF", *b"MATH",
    *b"CBDT", *b"CBLC", *b"COLR", *b"CPAL", *b"SVG ", *b"sbix", *b"acnt", *b"avar",
    *b"bdat", *b"bloc", *b"bsln", *b"cvar", *b"fdsc", *b"feat", *b"fmtx", *b"fvar",
    *b"gvar", *b"hsty", *b"just", *b"lcar", *b"mort", *b"morx", *b"opbd", *b"prop",
    *b"trak", *b"Zapf", *b"Silf", *b"Glat", *b"Gloc", *b"Feat", *b"Sill",
];

/// Check if data is WOFF format
pub fn is_woff(data: &[u8]) -> bool {
    signature(data) == Some(WOFF_SIGNATURE)
}

/// Check if data is WOFF2 format
pub fn is_woff2(data: &[u8]) -> bool {
    signature(data) == Some(WOFF2_SIGNATURE)
}

/// Unwrap a WOFF/WOFF2 container; sfnt data is passed through untouched
pub fn to_sfnt(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    if is_woff2(data) {
        decode_woff2(data).map(Cow::Owned)
    } else if is_woff(data) {
        decode_woff(data).map(Cow::Owned)
    } else {
        Ok(Cow::Borrowed(data))
    }
}

fn signature(data: &[u8]) -> Option<u32> {
    Reader::new(data).u32().ok()
}

fn invalid(what: &str) -> FontError {
    FontError::Container(what.to_string())
}

/// Big-endian cursor over a byte slice
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or_else(|| invalid("truncated data"))?;
        let bytes = self.data.get(self.pos..end).ok_or_else(|| invalid("truncated data"))?;
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.bytes(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn tag(&mut self) -> Result<[u8; 4]> {
        let b = self.bytes(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    /// WOFF2 UIntBase128
    fn uint_base128(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for i in 0..5 {
            let byte = self.u8()?;
            if i == 0 && byte == 0x80 {
                return Err(invalid("leading zero in UIntBase128"));
            }
            if value & 0xFE00_0000 != 0 {
                return Err(invalid("UIntBase128 overflow"));
            }
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(invalid("UIntBase128 too long"))
    }
}

// ============================================================================
// WOFF1
// ============================================================================

fn decode_woff(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = Reader::new(data);
    let _signature = reader.u32()?;
    let flavor = reader.u32()?;
    reader.bytes(4)?; // length
    let num_tables = reader.u16()?;
    reader.bytes(WOFF_HEADER_LEN - 14)?;

    let mut tables = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let tag = reader.tag()?;
        let offset = reader.u32()? as usize;
        let comp_length = reader.u32()? as usize;
        let orig_length = reader.u32()? as usize;
        let _orig_checksum = reader.u32()?;

        let stored = offset
            .checked_add(comp_length)
            .and_then(|end| data.get(offset..end))
            .ok_or_else(|| invalid("WOFF table out of bounds"))?;

        let table = if comp_length < orig_length {
            let mut table = Vec::new();
            flate2::read::ZlibDecoder::new(stored)
                .take(orig_length as u64)
                .read_to_end(&mut table)
                .map_err(|e| FontError::Container(format!("WOFF table inflate failed: {e}")))?;
            table
        } else {
            stored.to_vec()
        };
        if table.len() != orig_length {
            return Err(invalid("WOFF table length mismatch"));
        }
        tables.push((tag, table));
    }

    Ok(build_sfnt(flavor, tables))
}

// ============================================================================
// WOFF2
// ============================================================================

struct Woff2Entry {
    tag: [u8; 4],
    /// Bytes occupied in the decompressed stream
    stream_length: usize,
    transformed: bool,
}

fn decode_woff2(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = Reader::new(data);
    let _signature = reader.u32()?;
    let flavor = reader.u32()?;
    if flavor == u32::from_be_bytes(*b"ttcf") {
        return Err(invalid("WOFF2 font collections are not supported"));
    }
    reader.bytes(4)?; // length
    let num_tables = reader.u16()?;
    reader.bytes(2 + 4)?; // reserved, totalSfntSize
    let total_compressed_size = reader.u32()? as usize;
    reader.bytes(WOFF2_HEADER_LEN - 24)?;

    let mut entries = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let flags = reader.u8()?;
        let tag = match flags & 0x3F {
            0x3F => reader.tag()?,
            idx => KNOWN_TAGS[idx as usize],
        };
        let orig_length = reader.uint_base128()?;

        // Transform version 0 means "transformed" for glyf/loca and "null" elsewhere
        let version = flags >> 6;
        let transformed = if &tag == b"glyf" || &tag == b"loca" {
            version == 0
        } else {
            version != 0
        };
        let stream_length = if transformed { reader.uint_base128()? } else { orig_length };

        entries.push(Woff2Entry {
            tag,
            stream_length: stream_length as usize,
            transformed,
        });
    }

    let compressed = reader.bytes(total_compressed_size)?;
    let expected: usize = entries.iter().map(|e| e.stream_length).sum();
    let mut stream = Vec::new();
    brotli::Decompressor::new(compressed, 4096)
        .take(expected as u64)
        .read_to_end(&mut stream)
        .map_err(|e| FontError::Container(format!("WOFF2 brotli decode failed: {e}")))?;
    if stream.len() != expected {
        return Err(invalid("WOFF2 stream shorter than its table directory"));
    }

    let mut offset = 0;
    let mut tables = Vec::with_capacity(entries.len());
    for entry in entries {
        let end = offset + entry.stream_length;
        if !entry.transformed {
            tables.push((entry.tag, stream[offset..end].to_vec()));
        }
        offset = end;
    }

    Ok(build_sfnt(flavor, tables))
}

// ============================================================================
// sfnt output
// ============================================================================

/// Assemble an sfnt with a tag-sorted table directory
fn build_sfnt(flavor: u32, mut tables: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
    tables.sort_by(|a, b| a.0.cmp(&b.0));

    let num_tables = tables.len() as u16;
    let entry_selector = if num_tables == 0 { 0 } else { 15 - num_tables.leading_zeros() as u16 };
    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = num_tables.saturating_mul(16).saturating_sub(search_range);

    let header_size = 12 + tables.len() * 16;
    let mut font = Vec::with_capacity(header_size + tables.iter().map(|(_, t)| t.len() + 3).sum::<usize>());
    font.extend_from_slice(&flavor.to_be_bytes());
    for v in [num_tables, search_range, entry_selector, range_shift] {
        font.extend_from_slice(&v.to_be_bytes());
    }

    let mut offset = header_size;
    for (tag, table) in &tables {
        font.extend_from_slice(tag);
        font.extend_from_slice(&checksum(table).to_be_bytes());
        font.extend_from_slice(&(offset as u32).to_be_bytes());
        font.extend_from_slice(&(table.len() as u32).to_be_bytes());
        offset += (table.len() + 3) & !3;
    }
    for (_, table) in &tables {
        font.extend_from_slice(table);
        font.resize((font.len() + 3) & !3, 0);
    }
    font
}

fn checksum(table: &[u8]) -> u32 {
    table.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}
