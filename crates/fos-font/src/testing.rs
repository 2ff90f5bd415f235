//! Hand-built font binaries for unit tests

use std::io::Write;

/// Minimal sfnt with `head`, `hhea`, `maxp` and a Windows/Unicode `name` table
pub fn build_test_font(names: &[(u16, &str)]) -> Vec<u8> {
    let mut head = vec![0u8; 54];
    head[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    head[18..20].copy_from_slice(&1000u16.to_be_bytes());

    let mut hhea = vec![0u8; 36];
    hhea[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    hhea[34..36].copy_from_slice(&1u16.to_be_bytes());

    let mut maxp = vec![0u8; 6];
    maxp[0..4].copy_from_slice(&0x0000_5000u32.to_be_bytes());
    maxp[4..6].copy_from_slice(&1u16.to_be_bytes());

    let mut storage = Vec::new();
    let mut records = Vec::new();
    for (id, text) in names {
        let encoded: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
        for v in [3u16, 1, 0x0409, *id, encoded.len() as u16, storage.len() as u16] {
            records.extend_from_slice(&v.to_be_bytes());
        }
        storage.extend_from_slice(&encoded);
    }
    let mut name = Vec::new();
    name.extend_from_slice(&0u16.to_be_bytes());
    name.extend_from_slice(&(names.len() as u16).to_be_bytes());
    name.extend_from_slice(&(6 + records.len() as u16).to_be_bytes());
    name.extend_from_slice(&records);
    name.extend_from_slice(&storage);

    let tables: [(&[u8; 4], Vec<u8>); 4] =
        [(b"head", head), (b"hhea", hhea), (b"maxp", maxp), (b"name", name)];

    let mut font = Vec::new();
    font.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    font.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    font.extend_from_slice(&[0, 64, 0, 2, 0, 0]);

    let mut offset = 12 + tables.len() * 16;
    let mut body = Vec::new();
    for (tag, data) in &tables {
        let mut sum = 0u32;
        for chunk in data.chunks(4) {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            sum = sum.wrapping_add(u32::from_be_bytes(word));
        }
        font.extend_from_slice(*tag);
        font.extend_from_slice(&sum.to_be_bytes());
        font.extend_from_slice(&(offset as u32).to_be_bytes());
        font.extend_from_slice(&(data.len() as u32).to_be_bytes());
        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + tables.len() * 16 + body.len();
    }
    font.extend_from_slice(&body);
    font
}

/// `(tag, checksum, table)` of every sfnt table, in directory order
fn sfnt_tables(font: &[u8]) -> Vec<([u8; 4], [u8; 4], Vec<u8>)> {
    let be32 = |at: usize| u32::from_be_bytes(font[at..at + 4].try_into().unwrap()) as usize;
    let count = u16::from_be_bytes([font[4], font[5]]) as usize;
    (0..count)
        .map(|i| {
            let record = 12 + i * 16;
            let (offset, length) = (be32(record + 8), be32(record + 12));
            let tag = font[record..record + 4].try_into().unwrap();
            let checksum = font[record + 4..record + 8].try_into().unwrap();
            (tag, checksum, font[offset..offset + length].to_vec())
        })
        .collect()
}

/// Wrap an sfnt in a WOFF1 container, deflating every table
pub fn woff_wrap(font: &[u8]) -> Vec<u8> {
    let tables = sfnt_tables(font);
    let flavor = &font[0..4];

    let mut directory = Vec::new();
    let mut body = Vec::new();
    let data_start = 44 + tables.len() * 20;
    for (tag, checksum, table) in &tables {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
        encoder.write_all(table).unwrap();
        let compressed = encoder.finish().unwrap();
        let stored = if compressed.len() < table.len() { compressed } else { table.clone() };

        directory.extend_from_slice(tag);
        directory.extend_from_slice(&((data_start + body.len()) as u32).to_be_bytes());
        directory.extend_from_slice(&(stored.len() as u32).to_be_bytes());
        directory.extend_from_slice(&(table.len() as u32).to_be_bytes());
        directory.extend_from_slice(checksum);
        body.extend_from_slice(&stored);
        while body.len() % 4 != 0 {
            body.push(0);
        }
    }

    let mut woff = Vec::new();
    woff.extend_from_slice(b"wOFF");
    woff.extend_from_slice(flavor);
    woff.extend_from_slice(&((data_start + body.len()) as u32).to_be_bytes());
    woff.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    woff.extend_from_slice(&[0, 0]);
    woff.extend_from_slice(&(font.len() as u32).to_be_bytes());
    woff.extend_from_slice(&[0, 1, 0, 0]);
    woff.extend_from_slice(&[0u8; 20]);
    woff.extend_from_slice(&directory);
    woff.extend_from_slice(&body);
    woff
}

/// Wrap an sfnt in a WOFF2 container with null transforms and one brotli stream
pub fn woff2_wrap(font: &[u8]) -> Vec<u8> {
    const KNOWN: [&[u8; 4]; 6] = [b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name"];

    let tables = sfnt_tables(font);
    let mut directory = Vec::new();
    let mut stream = Vec::new();
    for (tag, _, table) in &tables {
        let index = KNOWN.iter().position(|known| *known == tag).unwrap() as u8;
        directory.push(index);
        directory.extend_from_slice(&base128(table.len() as u32));
        stream.extend_from_slice(table);
    }

    let mut compressed = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut compressed, 4096, 9, 22);
        writer.write_all(&stream).unwrap();
    }

    let mut woff2 = Vec::new();
    woff2.extend_from_slice(b"wOF2");
    woff2.extend_from_slice(&font[0..4]);
    woff2.extend_from_slice(&((48 + directory.len() + compressed.len()) as u32).to_be_bytes());
    woff2.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    woff2.extend_from_slice(&[0, 0]);
    woff2.extend_from_slice(&(font.len() as u32).to_be_bytes());
    woff2.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
    woff2.extend_from_slice(&[0, 1, 0, 0]);
    woff2.extend_from_slice(&[0u8; 20]);
    woff2.extend_from_slice(&directory);
    woff2.extend_from_slice(&compressed);
    woff2
}

fn base128(mut value: u32) -> Vec<u8> {
    let mut out = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        out.insert(0, (value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    out
}
