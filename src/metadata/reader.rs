use flate2::read::ZlibDecoder;
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::{Bytes, DynImage, ImageEXIF};
use nom_exif::{EntryValue, Exif, ExifIter, MediaParser, MediaSource};
use std::io::{Cursor, Read};

use super::iptc::{self, PHOTOSHOP_HEADER};
use super::xmp::{self, XMP_JPEG_PREFIX, XMP_PNG_KEYWORD};
use super::{MetadataBundle, MetadataDecoder, MetadataGroup};
use crate::error::DecodeError;

// IFD0 tags exposed in the TIFF group
const TIFF_TAGS: &[(u16, &str)] = &[
    (0x010E, "ImageDescription"),
    (0x010F, "Make"),
    (0x0110, "Model"),
    (0x0131, "Software"),
    (0x013B, "Artist"),
    (0x8298, "Copyright"),
];

const EXIF_PREFIX: &[u8] = b"Exif\0\0";
// nom-exif probes a header, then expects more input to fill its first
// buffer. Zeros after the IFDs are never addressed by an offset.
const MIN_EXIF_INPUT: usize = 4096;
const RAW_PROFILE_PREFIX: &str = "Raw profile type ";

const JPEG_APP1: u8 = 0xE1;
const JPEG_APP13: u8 = 0xED;

/// Default decoder: container parsing with `img-parts`, EXIF with `nom-exif`.
///
/// | Container | TIFF | IPTC | PNG |
/// |-----------|------|------|-----|
/// | PNG  | `eXIf`, raw exif profile | raw iptc profile, XMP | text chunks |
/// | JPEG | APP1 Exif | APP13 8BIM, XMP | — |
/// | WebP | EXIF chunk | — | — |
/// | TIFF | IFD0 | — | — |
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageMetadataDecoder;

impl ImageMetadataDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataDecoder for ImageMetadataDecoder {
    fn name(&self) -> &str {
        "img-parts + nom-exif"
    }

    fn decode(&self, bytes: &[u8]) -> Result<MetadataBundle, DecodeError> {
        if is_tiff(bytes) {
            let mut bundle = MetadataBundle::new();
            read_tiff(bytes, &mut bundle)?;
            return Ok(bundle);
        }

        let image = DynImage::from_bytes(Bytes::copy_from_slice(bytes))
            .map_err(|e| DecodeError::Malformed(e.to_string()))?
            .ok_or(DecodeError::UnsupportedFormat)?;

        let bundle = match image {
            DynImage::Png(png) => decode_png(&png),
            DynImage::Jpeg(jpeg) => decode_jpeg(&jpeg),
            other => {
                let mut bundle = MetadataBundle::new();
                if let Some(exif) = other.exif() {
                    read_embedded_exif(&exif, &mut bundle);
                }
                bundle
            }
        };

        Ok(bundle)
    }
}

fn is_tiff(bytes: &[u8]) -> bool {
    bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*")
}

/// Read the IFD0 text tags of a TIFF structure into the TIFF group.
fn read_tiff(tiff: &[u8], bundle: &mut MetadataBundle) -> Result<(), DecodeError> {
    let mut input = tiff.to_vec();
    if input.len() < MIN_EXIF_INPUT {
        input.resize(MIN_EXIF_INPUT, 0);
    }

    let mut parser = MediaParser::new();
    let ms = MediaSource::seekable(Cursor::new(input))
        .map_err(|e| DecodeError::Exif(e.to_string()))?;
    let iter: ExifIter = parser
        .parse(ms)
        .map_err(|e| DecodeError::Exif(e.to_string()))?;
    let exif: Exif = iter.into();

    for (code, name) in TIFF_TAGS {
        if let Some(value) = exif.get_by_ifd_tag_code(0, *code).and_then(entry_to_text) {
            bundle.insert(MetadataGroup::Tiff, *name, value);
        }
    }
    Ok(())
}

/// EXIF embedded in another container: a broken block only costs the TIFF group.
fn read_embedded_exif(exif: &[u8], bundle: &mut MetadataBundle) {
    let tiff = exif.strip_prefix(EXIF_PREFIX).unwrap_or(exif);
    if let Err(e) = read_tiff(tiff, bundle) {
        log::debug!("Ignoring unreadable EXIF block: {e}");
    }
}

/// ASCII tags only; the trailing NUL padding is not part of the value.
fn entry_to_text(val: &EntryValue) -> Option<String> {
    match val {
        EntryValue::Text(s) => {
            let s = s.trim_end_matches('\0');
            if s.is_empty() { None } else { Some(s.to_string()) }
        }
        _ => None,
    }
}

// ============================================================================
// PNG
// ============================================================================

/// A decoded `tEXt` / `zTXt` / `iTXt` chunk.
#[derive(Debug, PartialEq)]
struct TextChunk {
    keyword: String,
    text: String,
}

fn decode_png(png: &Png) -> MetadataBundle {
    let mut bundle = MetadataBundle::new();
    let mut xmp_packets = Vec::new();

    for chunk in png.chunks() {
        let parsed = match &chunk.kind() {
            b"tEXt" => parse_text_chunk(chunk.contents()),
            b"zTXt" => parse_ztxt_chunk(chunk.contents()),
            b"iTXt" => parse_itxt_chunk(chunk.contents()),
            _ => continue,
        };
        let TextChunk { keyword, text } = match parsed {
            Ok(t) => t,
            Err(e) => {
                log::debug!("Skipping PNG text chunk: {e}");
                continue;
            }
        };

        if keyword == XMP_PNG_KEYWORD {
            xmp_packets.push(text);
        } else if let Some(profile) = keyword.strip_prefix(RAW_PROFILE_PREFIX) {
            apply_raw_profile(profile, &text, &mut bundle, &mut xmp_packets);
        } else {
            bundle.insert_missing(MetadataGroup::Png, keyword, text);
        }
    }

    if let Some(exif) = png.exif() {
        read_embedded_exif(&exif, &mut bundle);
    }

    // XMP last so IIM datasets win
    for packet in &xmp_packets {
        xmp::merge_xmp(packet, &mut bundle);
    }

    bundle
}

fn split_keyword(data: &[u8]) -> Result<(String, &[u8]), DecodeError> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| DecodeError::Malformed("text chunk without keyword separator".into()))?;
    if nul == 0 || nul > 79 {
        return Err(DecodeError::Malformed(format!("invalid keyword length {nul}")));
    }
    Ok((latin1_to_string(&data[..nul]), &data[nul + 1..]))
}

fn parse_text_chunk(data: &[u8]) -> Result<TextChunk, DecodeError> {
    let (keyword, rest) = split_keyword(data)?;
    Ok(TextChunk { keyword, text: latin1_to_string(rest) })
}

fn parse_ztxt_chunk(data: &[u8]) -> Result<TextChunk, DecodeError> {
    let (keyword, rest) = split_keyword(data)?;
    let (&method, compressed) = rest
        .split_first()
        .ok_or_else(|| DecodeError::Malformed("zTXt without compression method".into()))?;
    if method != 0 {
        return Err(DecodeError::Malformed(format!("unknown zTXt compression method {method}")));
    }
    Ok(TextChunk { keyword, text: latin1_to_string(&inflate(compressed)?) })
}

fn parse_itxt_chunk(data: &[u8]) -> Result<TextChunk, DecodeError> {
    let (keyword, rest) = split_keyword(data)?;
    if rest.len() < 2 {
        return Err(DecodeError::Malformed("truncated iTXt header".into()));
    }
    let (compressed, method) = (rest[0], rest[1]);

    // Language tag, then translated keyword, both NUL terminated
    let mut rest = &rest[2..];
    for _ in 0..2 {
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| DecodeError::Malformed("truncated iTXt header".into()))?;
        rest = &rest[nul + 1..];
    }

    let raw = match (compressed, method) {
        (0, _) => rest.to_vec(),
        (1, 0) => inflate(rest)?,
        (1, m) => {
            return Err(DecodeError::Malformed(format!("unknown iTXt compression method {m}")));
        }
        (flag, _) => {
            return Err(DecodeError::Malformed(format!("invalid iTXt compression flag {flag}")));
        }
    };
    let text = String::from_utf8(raw)
        .map_err(|_| DecodeError::Malformed(format!("iTXt '{keyword}' is not UTF-8")))?;
    Ok(TextChunk { keyword, text })
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::Malformed(format!("zlib: {e}")))?;
    Ok(out)
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Decode an ImageMagick raw profile: `\n<type>\n<length>\n<hex lines>`.
fn decode_raw_profile(text: &str) -> Result<Vec<u8>, DecodeError> {
    let mut lines = text.trim_start_matches('\n').splitn(3, '\n');
    let _name = lines.next();
    let length: usize = lines
        .next()
        .and_then(|l| l.trim().parse().ok())
        .ok_or_else(|| DecodeError::Malformed("raw profile without length".into()))?;
    let digits: String = lines
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let mut data = hex::decode(digits)
        .map_err(|e| DecodeError::Malformed(format!("raw profile: {e}")))?;
    if data.len() < length {
        return Err(DecodeError::Malformed(format!(
            "raw profile holds {} bytes, expected {length}",
            data.len()
        )));
    }
    data.truncate(length);
    Ok(data)
}

fn apply_raw_profile(
    profile: &str,
    text: &str,
    bundle: &mut MetadataBundle,
    xmp_packets: &mut Vec<String>,
) {
    let data = match decode_raw_profile(text) {
        Ok(d) => d,
        Err(e) => {
            log::debug!("Skipping raw {profile} profile: {e}");
            return;
        }
    };

    match profile.to_ascii_lowercase().as_str() {
        "exif" | "app1" => read_embedded_exif(&data, bundle),
        "iptc" | "8bim" => read_iptc_block(&data, bundle),
        "xmp" => match String::from_utf8(data) {
            Ok(xml) => xmp_packets.push(xml),
            Err(_) => log::debug!("Skipping raw xmp profile: not UTF-8"),
        },
        other => log::debug!("Ignoring raw {other} profile"),
    }
}

/// IPTC either wrapped in Photoshop resources or as bare IIM datasets.
fn read_iptc_block(data: &[u8], bundle: &mut MetadataBundle) {
    match iptc::find_iim_resource(data) {
        Some(iim) => {
            iptc::parse_iim(iim, bundle);
        }
        None => {
            iptc::parse_iim(data, bundle);
        }
    }
}

// ============================================================================
// JPEG
// ============================================================================

fn decode_jpeg(jpeg: &Jpeg) -> MetadataBundle {
    let mut bundle = MetadataBundle::new();
    let mut xmp_packets = Vec::new();

    for segment in jpeg.segments() {
        let contents = segment.contents();
        match segment.marker() {
            JPEG_APP1 if contents.starts_with(XMP_JPEG_PREFIX) => {
                let xml = String::from_utf8_lossy(&contents[XMP_JPEG_PREFIX.len()..]);
                xmp_packets.push(xml.into_owned());
            }
            JPEG_APP13 if contents.starts_with(PHOTOSHOP_HEADER) => {
                read_iptc_block(contents, &mut bundle);
            }
            _ => {}
        }
    }

    if let Some(exif) = jpeg.exif() {
        read_embedded_exif(&exif, &mut bundle);
    }

    for packet in &xmp_packets {
        xmp::merge_xmp(packet, &mut bundle);
    }

    bundle
}
