use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::metadata::{ImageMetadataDecoder, MetadataBundle, MetadataDecoder, MetadataGroup};

/// Where a legal mention may live, tried in order.
///
/// Add a row to support another group; callers do not change.
pub const CREDIT_FIELDS: &[(MetadataGroup, &str)] = &[
    (MetadataGroup::Tiff, "Copyright"),
    (MetadataGroup::Iptc, "CopyrightNotice"),
    (MetadataGroup::Png, "Copyright"),
];

/// Why a file passed or failed the check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FileOutcome {
    /// One of the [`CREDIT_FIELDS`] holds exactly the expected mention.
    Suitable,
    /// Metadata was read but no credit field equals the mention.
    MissingMention,
    /// The file decoded fine but carries no metadata at all.
    NoMetadata,
    /// The file could not be read from disk.
    ReadFailed(String),
    /// The bytes could not be decoded as a supported image.
    DecodeFailed(String),
}

impl FileOutcome {
    pub fn is_suitable(&self) -> bool {
        matches!(self, Self::Suitable)
    }
}

/// The check result of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCheck {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    /// The group whose field matched, for suitable files.
    pub matched_group: Option<MetadataGroup>,
}

impl FileCheck {
    pub fn is_suitable(&self) -> bool {
        self.outcome.is_suitable()
    }
}

/// Per-file results of a run, in the order the files were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub files: Vec<FileCheck>,
}

impl CheckReport {
    /// True when every file is suitable.
    ///
    /// An empty report passes too: a folder with no matching file is
    /// reported as a success. Use [`CheckReport::is_empty`] to tell the two
    /// apart.
    pub fn all_suitable(&self) -> bool {
        self.files.iter().all(FileCheck::is_suitable)
    }

    pub fn unsuitable(&self) -> impl Iterator<Item = &FileCheck> {
        self.files.iter().filter(|f| !f.is_suitable())
    }

    pub fn suitable_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_suitable()).count()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Return the first credit group whose field equals `expected` exactly.
pub fn find_credit(bundle: &MetadataBundle, expected: &str) -> Option<MetadataGroup> {
    let mut matched = None;
    for (group, field) in CREDIT_FIELDS {
        if bundle.text(*group, field) == Some(expected) {
            matched.get_or_insert(*group);
        } else {
            log::debug!("Legal mention not defined in {group} metadata field");
        }
    }
    matched
}

/// Reads image metadata and looks for the expected legal mention.
pub struct MetadataExplorer {
    decoder: Box<dyn MetadataDecoder>,
}

impl Default for MetadataExplorer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetadataExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataExplorer")
            .field("decoder", &self.decoder.name())
            .finish()
    }
}

impl MetadataExplorer {
    /// Explorer backed by [`ImageMetadataDecoder`].
    pub fn new() -> Self {
        Self::with_decoder(Box::new(ImageMetadataDecoder::new()))
    }

    pub fn with_decoder(decoder: Box<dyn MetadataDecoder>) -> Self {
        Self { decoder }
    }

    /// Check one file. Read and decode failures count as unsuitable.
    pub fn inspect(&self, path: &Path, expected: &str) -> FileCheck {
        let mut check = FileCheck {
            path: path.to_path_buf(),
            outcome: FileOutcome::MissingMention,
            matched_group: None,
        };

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("A problem occurred with the file at '{}': {e}", path.display());
                check.outcome = FileOutcome::ReadFailed(e.to_string());
                return check;
            }
        };

        let bundle = match self.decoder.decode(&bytes) {
            Ok(bundle) => bundle,
            Err(e) => {
                log::debug!("A problem occurred with the file at '{}': {e}", path.display());
                check.outcome = FileOutcome::DecodeFailed(e.to_string());
                return check;
            }
        };

        if bundle.is_empty() {
            log::debug!("It seems no metadata are available for file at '{}'", path.display());
            check.outcome = FileOutcome::NoMetadata;
            return check;
        }

        if let Some(group) = find_credit(&bundle, expected) {
            log::debug!("Legal mention found in {group} metadata of {}", path.display());
            check.outcome = FileOutcome::Suitable;
            check.matched_group = Some(group);
        }

        check
    }

    /// True if the file at `path` carries `expected` in a credit field.
    pub fn check_one(&self, path: &Path, expected: &str) -> bool {
        self.inspect(path, expected).is_suitable()
    }

    /// Check every file in order and keep the per-file results.
    pub fn explore(&self, files: &[PathBuf], expected: &str) -> CheckReport {
        log::debug!("Will process {} files", files.len());
        let mut report = CheckReport::default();

        for file in files {
            log::debug!("Processing file '{}'", file.display());
            let check = self.inspect(file, expected);
            if !check.is_suitable() {
                log::debug!(
                    "It seems the file at {} does not have the mention in metadata",
                    file.display()
                );
            }
            report.files.push(check);
        }

        report
    }

    /// True if every file carries the mention; true for an empty list.
    pub fn check_all(&self, files: &[PathBuf], expected: &str) -> bool {
        self.explore(files, expected).all_suitable()
    }
}
