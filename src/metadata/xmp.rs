use super::{MetadataBundle, MetadataGroup};

/// Packet identifier of an XMP APP1 segment in JPEG.
pub(super) const XMP_JPEG_PREFIX: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";
/// Keyword of the `iTXt` chunk holding XMP in PNG.
pub(super) const XMP_PNG_KEYWORD: &str = "XML:com.adobe.xmp";

// XMP properties folded into the IPTC group, as image readers expose them
const XMP_TO_IPTC: &[(&str, &str)] = &[
    ("dc:rights", "CopyrightNotice"),
    ("photoshop:Credit", "Credit"),
    ("dc:creator", "Byline"),
    ("photoshop:Headline", "Headline"),
    ("photoshop:Source", "Source"),
];

/// Fold the IPTC-equivalent properties of an XMP packet into `bundle`.
///
/// Fields already present in the IPTC group are left alone, so IIM data wins
/// over XMP when both are embedded.
pub(super) fn merge_xmp(xml: &str, bundle: &mut MetadataBundle) {
    for (property, field) in XMP_TO_IPTC {
        if let Some(value) = property_value(xml, property) {
            log::debug!("XMP {property} -> IPTC {field}");
            bundle.insert_missing(MetadataGroup::Iptc, *field, value);
        }
    }
}

/// Read a simple XMP property, in element or attribute form.
///
/// For language alternatives the `x-default` item wins, wherever it sits;
/// otherwise, and for ordered arrays, the first `rdf:li`.
fn property_value(xml: &str, property: &str) -> Option<String> {
    element_text(xml, property).or_else(|| attribute_value(xml, property))
}

fn element_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut search_from = 0;
    let start = loop {
        let found = search_from + xml[search_from..].find(&open)?;
        let after = found + open.len();
        // Reject longer names sharing the prefix (e.g. dc:rightsHolder)
        match xml[after..].chars().next() {
            Some('>') | Some(' ') | Some('\n') | Some('\r') | Some('\t') => break after,
            Some('/') => return None,
            _ => search_from = after,
        }
    };

    let content_start = start + xml[start..].find('>')? + 1;
    let content_end = content_start + xml[content_start..].find(&close)?;
    let inner = &xml[content_start..content_end];

    let text = if inner.contains("<rdf:li") {
        pick_list_item(inner)?
    } else {
        inner
    };

    let text = xml_unescape(text.trim());
    if text.is_empty() { None } else { Some(text) }
}

fn pick_list_item(inner: &str) -> Option<&str> {
    let mut first = None;
    let mut rest = inner;
    while let Some(li) = rest.find("<rdf:li") {
        let open_end = li + rest[li..].find('>')?;
        let open_tag = &rest[li..open_end];
        let item_start = open_end + 1;
        let item_end = item_start + rest[item_start..].find("</rdf:li>")?;
        let item = &rest[item_start..item_end];

        if open_tag.contains(r#"xml:lang="x-default""#) {
            return Some(item);
        }
        first.get_or_insert(item);
        rest = &rest[item_end..];
    }
    first
}

fn attribute_value(xml: &str, name: &str) -> Option<String> {
    let pattern = format!("{name}=\"");
    let mut search_from = 0;
    loop {
        let found = search_from + xml[search_from..].find(&pattern)?;
        let preceded_by_space = xml[..found]
            .chars()
            .next_back()
            .map(char::is_whitespace)
            .unwrap_or(false);
        let value_start = found + pattern.len();
        if preceded_by_space {
            let value_end = value_start + xml[value_start..].find('"')?;
            let text = xml_unescape(&xml[value_start..value_end]);
            return if text.is_empty() { None } else { Some(text) };
        }
        search_from = value_start;
    }
}

/// Resolve the predefined XML entities and numeric character references.
fn xml_unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        let entity = &tail[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
