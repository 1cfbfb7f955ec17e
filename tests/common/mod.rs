//! Image fixtures written to temporary folders.

#![allow(dead_code)]

#[path = "../../src/metadata/fixtures.rs"]
mod fixtures;

pub use fixtures::*;

use std::fs;
use std::path::{Path, PathBuf};

pub const MENTION: &str = "© Orange 2019";

/// A 1x1 PNG carrying the given extra chunks.
pub fn png(chunks: &[Vec<u8>]) -> Vec<u8> {
    png_with_chunks(chunks)
}

/// `iTXt` chunk, uncompressed UTF-8.
pub fn png_text(keyword: &str, text: &str) -> Vec<u8> {
    itxt_chunk(keyword, text, false)
}

/// IPTC `CopyrightNotice` stored as an ImageMagick raw iptc profile.
pub fn png_iptc_copyright(notice: &str) -> Vec<u8> {
    let mut iim = vec![0x1C, 0x02, 0x74];
    iim.extend_from_slice(&(notice.len() as u16).to_be_bytes());
    iim.extend_from_slice(notice.as_bytes());
    text_chunk("Raw profile type iptc", &raw_profile("iptc", &iim))
}

/// `eXIf` chunk holding a TIFF `Copyright` tag.
pub fn png_exif_copyright(copyright: &str) -> Vec<u8> {
    png_chunk(b"eXIf", &tiff_with_ascii_tags(&[(0x8298, copyright)]))
}

/// JPEG whose APP1 Exif segment holds a TIFF `Copyright` tag.
pub fn jpeg_exif_copyright(copyright: &str) -> Vec<u8> {
    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend(tiff_with_ascii_tags(&[(0x8298, copyright)]));
    jpeg_with_segments(&[(0xE1, app1)])
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}
