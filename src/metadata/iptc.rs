// ============================================================================
// IPTC-IIM Metadata Reading (APP13 / Photoshop 3.0 / raw IIM)
// ============================================================================

use super::{MetadataBundle, MetadataGroup};

pub(super) const PHOTOSHOP_HEADER: &[u8] = b"Photoshop 3.0\0";
const IPTC_8BIM: &[u8] = b"8BIM";
const IPTC_IIM_RESOURCE: u16 = 0x0404;
const IIM_TAG_MARKER: u8 = 0x1C;

// Application record (2:xx) datasets, named after the IPTC dictionary keys
const APPLICATION_DATASETS: &[(u8, &str)] = &[
    (5, "ObjectName"),
    (25, "Keywords"),
    (80, "Byline"),
    (85, "BylineTitle"),
    (105, "Headline"),
    (110, "Credit"),
    (115, "Source"),
    (116, "CopyrightNotice"),
    (120, "Caption/Abstract"),
];

// Keywords may repeat; every other dataset keeps its first occurrence
const REPEATABLE_DATASETS: &[u8] = &[25];

/// Locate the IPTC-IIM payload inside a Photoshop image resource block.
///
/// Accepts the block with or without the `Photoshop 3.0\0` header. Walks the
/// `8BIM` resources and returns resource 0x0404, if any.
pub(super) fn find_iim_resource(data: &[u8]) -> Option<&[u8]> {
    let mut pos = if data.starts_with(PHOTOSHOP_HEADER) {
        PHOTOSHOP_HEADER.len()
    } else {
        0
    };

    while pos + 12 <= data.len() {
        if &data[pos..pos + 4] != IPTC_8BIM {
            break;
        }
        let resource_id = u16::from_be_bytes([data[pos + 4], data[pos + 5]]);
        // Pascal name: 1 length byte + name, padded to even
        let pascal_len = data[pos + 6] as usize;
        let pascal_padded = if (pascal_len + 1) % 2 == 0 { pascal_len + 1 } else { pascal_len + 2 };
        let data_start = pos + 6 + pascal_padded;
        if data_start + 4 > data.len() {
            break;
        }
        let data_len = u32::from_be_bytes([
            data[data_start], data[data_start + 1],
            data[data_start + 2], data[data_start + 3],
        ]) as usize;
        let payload_start = data_start + 4;
        let payload_end = payload_start.saturating_add(data_len);
        if payload_end > data.len() {
            log::debug!("Truncated 8BIM resource 0x{resource_id:04X}");
            break;
        }

        if resource_id == IPTC_IIM_RESOURCE {
            return Some(&data[payload_start..payload_end]);
        }

        pos = if data_len % 2 == 0 { payload_end } else { payload_end + 1 };
    }

    None
}

/// Parse IPTC-IIM datasets into the IPTC group of `bundle`.
///
/// Returns the number of application datasets read. Parsing stops at the
/// first malformed record; datasets read before it are kept.
pub(super) fn parse_iim(data: &[u8], bundle: &mut MetadataBundle) -> usize {
    let mut pos = 0;
    let mut count = 0;

    while pos + 5 <= data.len() {
        if data[pos] != IIM_TAG_MARKER {
            log::debug!("IPTC-IIM: unexpected byte 0x{:02X} at {pos}", data[pos]);
            break;
        }
        let record = data[pos + 1];
        let dataset = data[pos + 2];
        let raw_len = u16::from_be_bytes([data[pos + 3], data[pos + 4]]);
        pos += 5;

        // Extended dataset: the low 15 bits give the size of the length field
        let len = if raw_len & 0x8000 != 0 {
            let size = (raw_len & 0x7FFF) as usize;
            if size == 0 || size > 4 || pos + size > data.len() {
                break;
            }
            let len = data[pos..pos + size]
                .iter()
                .fold(0usize, |acc, b| (acc << 8) | *b as usize);
            pos += size;
            len
        } else {
            raw_len as usize
        };

        let end = pos.saturating_add(len);
        if end > data.len() {
            log::debug!("IPTC-IIM: truncated dataset {record}:{dataset}");
            break;
        }
        let value = &data[pos..end];
        pos = end;

        if record != 2 {
            continue;
        }
        let Some(name) = dataset_name(dataset) else {
            continue;
        };
        let text = decode_text(value);
        if REPEATABLE_DATASETS.contains(&dataset) {
            bundle.push(MetadataGroup::Iptc, name, text);
        } else {
            bundle.insert_missing(MetadataGroup::Iptc, name, text);
        }
        count += 1;
    }

    count
}

fn dataset_name(dataset: u8) -> Option<&'static str> {
    APPLICATION_DATASETS
        .iter()
        .find(|(id, _)| *id == dataset)
        .map(|(_, name)| *name)
}

/// IIM text is UTF-8 in practice; anything else is read as Latin-1.
fn decode_text(value: &[u8]) -> String {
    let text = match std::str::from_utf8(value) {
        Ok(s) => s.to_string(),
        Err(_) => value.iter().map(|&b| b as char).collect(),
    };
    text.trim_end_matches('\0').to_string()
}

#[cfg(test)]
pub(super) fn iim_dataset(record: u8, dataset: u8, value: &[u8]) -> Vec<u8> {
    let mut out = vec![IIM_TAG_MARKER, record, dataset];
    out.extend_from_slice(&(value.len() as u16).to_be_bytes());
    out.extend_from_slice(value);
    out
}

#[cfg(test)]
pub(super) fn photoshop_block(iim: &[u8]) -> Vec<u8> {
    let mut out = PHOTOSHOP_HEADER.to_vec();
    out.extend_from_slice(IPTC_8BIM);
    out.extend_from_slice(&IPTC_IIM_RESOURCE.to_be_bytes());
    out.extend_from_slice(&[0x00, 0x00]);
    out.extend_from_slice(&(iim.len() as u32).to_be_bytes());
    out.extend_from_slice(iim);
    if iim.len() % 2 != 0 {
        out.push(0x00);
    }
    out
}
