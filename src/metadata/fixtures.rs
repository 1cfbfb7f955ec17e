//! In-memory image builders for decoder and explorer tests.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).expect("latin-1 text"))
        .collect()
}

/// A complete PNG chunk: length, type, data and CRC.
pub fn png_chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let mut crc = flate2::Crc::new();
    crc.update(kind);
    crc.update(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out
}

/// A 1x1 RGBA PNG with `chunks` inserted between IHDR and IDAT.
pub fn png_with_chunks(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);

    let mut out = PNG_SIGNATURE.to_vec();
    out.extend(png_chunk(b"IHDR", &ihdr));
    for chunk in chunks {
        out.extend_from_slice(chunk);
    }
    out.extend(png_chunk(b"IDAT", &zlib(&[0, 0, 0, 0, 0])));
    out.extend(png_chunk(b"IEND", &[]));
    out
}

pub fn text_chunk(keyword: &str, text: &str) -> Vec<u8> {
    let mut data = latin1(keyword);
    data.push(0);
    data.extend(latin1(text));
    png_chunk(b"tEXt", &data)
}

pub fn ztxt_chunk(keyword: &str, text: &str) -> Vec<u8> {
    let mut data = latin1(keyword);
    data.extend_from_slice(&[0, 0]);
    data.extend(zlib(&latin1(text)));
    png_chunk(b"zTXt", &data)
}

pub fn itxt_chunk(keyword: &str, text: &str, compressed: bool) -> Vec<u8> {
    let mut data = latin1(keyword);
    data.extend_from_slice(&[0, compressed as u8, 0]);
    // Empty language tag and translated keyword
    data.extend_from_slice(&[0, 0]);
    if compressed {
        data.extend(zlib(text.as_bytes()));
    } else {
        data.extend_from_slice(text.as_bytes());
    }
    png_chunk(b"iTXt", &data)
}

/// ImageMagick raw profile text for `data`.
pub fn raw_profile(name: &str, data: &[u8]) -> String {
    let mut out = format!("\n{name}\n{:8}\n", data.len());
    for line in hex::encode(data).as_bytes().chunks(72) {
        out.push_str(std::str::from_utf8(line).unwrap());
        out.push('\n');
    }
    out
}

/// Little-endian TIFF with a single IFD of ASCII tags.
pub fn tiff_with_ascii_tags(tags: &[(u16, &str)]) -> Vec<u8> {
    let mut tags = tags.to_vec();
    tags.sort_by_key(|(tag, _)| *tag);

    let ifd_offset = 8u32;
    let ifd_len = 2 + 12 * tags.len() as u32 + 4;
    let mut data_offset = ifd_offset + ifd_len;

    let mut out = b"II*\0".to_vec();
    out.extend_from_slice(&ifd_offset.to_le_bytes());
    out.extend_from_slice(&(tags.len() as u16).to_le_bytes());

    let mut data_area = Vec::new();
    for (tag, value) in &tags {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        if bytes.len() <= 4 {
            bytes.resize(4, 0);
            out.extend_from_slice(&bytes);
        } else {
            out.extend_from_slice(&data_offset.to_le_bytes());
            if bytes.len() % 2 != 0 {
                bytes.push(0);
            }
            data_offset += bytes.len() as u32;
            data_area.extend(bytes);
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend(data_area);
    out
}

/// A baseline JPEG skeleton carrying the given `(marker, contents)` segments.
pub fn jpeg_with_segments(segments: &[(u8, Vec<u8>)]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    for (marker, contents) in segments {
        out.extend_from_slice(&[0xFF, *marker]);
        out.extend_from_slice(&((contents.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(contents);
    }
    // Start of scan, one component, then a couple of entropy bytes
    out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    out.extend_from_slice(&[0x00, 0x00]);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}
