//! Image metadata decoding.
//!
//! The explorer only sees a [`MetadataBundle`]: a map of group name to
//! field name to value. Where those values come from is the business of a
//! [`MetadataDecoder`]. The shipped [`ImageMetadataDecoder`] understands PNG,
//! JPEG, WebP and TIFF containers and fills three groups:
//!
//! - [`MetadataGroup::Tiff`] — IFD0 tags of the embedded EXIF block
//! - [`MetadataGroup::Iptc`] — IPTC-IIM datasets, completed by XMP
//! - [`MetadataGroup::Png`] — `tEXt` / `zTXt` / `iTXt` keywords

#[cfg(test)]
pub(crate) mod fixtures;
mod iptc;
mod reader;
mod xmp;

pub use reader::ImageMetadataDecoder;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DecodeError;

/// A named section of an image's metadata, each with its own field namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetadataGroup {
    Tiff,
    Iptc,
    Png,
}

impl MetadataGroup {
    pub const ALL: [MetadataGroup; 3] = [Self::Tiff, Self::Iptc, Self::Png];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiff => "TIFF",
            Self::Iptc => "IPTC",
            Self::Png => "PNG",
        }
    }
}

impl fmt::Display for MetadataGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single metadata field value.
///
/// Most fields are plain text. Repeatable fields (IPTC keywords) are kept as
/// a list and never compare equal to a credit line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    List(Vec<String>),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

pub type MetadataFields = BTreeMap<String, MetadataValue>;

/// Decoded metadata of one image, keyed by group then field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataBundle {
    groups: BTreeMap<MetadataGroup, MetadataFields>,
}

impl MetadataBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no group holds any field.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(|fields| fields.is_empty())
    }

    pub fn group(&self, group: MetadataGroup) -> Option<&MetadataFields> {
        self.groups.get(&group).filter(|fields| !fields.is_empty())
    }

    pub fn get(&self, group: MetadataGroup, field: &str) -> Option<&MetadataValue> {
        self.groups.get(&group)?.get(field)
    }

    /// Text value of `field` in `group`, if present and not a list.
    pub fn text(&self, group: MetadataGroup, field: &str) -> Option<&str> {
        self.get(group, field)?.as_text()
    }

    /// Set a field, replacing any previous value.
    pub fn insert(
        &mut self,
        group: MetadataGroup,
        field: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) {
        self.groups
            .entry(group)
            .or_default()
            .insert(field.into(), value.into());
    }

    /// Set a field only if it is not already present.
    pub fn insert_missing(
        &mut self,
        group: MetadataGroup,
        field: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) {
        self.groups
            .entry(group)
            .or_default()
            .entry(field.into())
            .or_insert_with(|| value.into());
    }

    /// Append to a list field, turning an existing text value into a list.
    pub fn push(&mut self, group: MetadataGroup, field: impl Into<String>, item: String) {
        let fields = self.groups.entry(group).or_default();
        let field = field.into();
        let value = match fields.remove(&field) {
            Some(MetadataValue::List(mut items)) => {
                items.push(item);
                MetadataValue::List(items)
            }
            Some(MetadataValue::Text(first)) => MetadataValue::List(vec![first, item]),
            None => MetadataValue::List(vec![item]),
        };
        fields.insert(field, value);
    }

    /// Move every field of `other` into `self`, keeping fields already set.
    pub fn merge_missing(&mut self, other: MetadataBundle) {
        for (group, fields) in other.groups {
            let target = self.groups.entry(group).or_default();
            for (name, value) in fields {
                target.entry(name).or_insert(value);
            }
        }
    }
}

/// Turns raw image bytes into a [`MetadataBundle`].
///
/// Implement this trait to plug in another metadata backend. The crate ships
/// with [`ImageMetadataDecoder`].
pub trait MetadataDecoder: Send + Sync {
    /// The display name of this decoder.
    fn name(&self) -> &str;
    /// Decode all recognized metadata groups from `bytes`.
    fn decode(&self, bytes: &[u8]) -> Result<MetadataBundle, DecodeError>;
}
