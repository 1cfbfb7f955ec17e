use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a check run before any file is examined.
///
/// Per-file problems (unreadable or undecodable images) never surface here:
/// the explorer absorbs them into an unsuitable [`FileOutcome`](crate::explorer::FileOutcome).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Empty argument: {0}")]
    EmptyArgument(&'static str),

    #[error("Invalid resource filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors returned by a [`MetadataDecoder`](crate::metadata::MetadataDecoder).
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Malformed image data: {0}")]
    Malformed(String),

    #[error("EXIF error: {0}")]
    Exif(String),
}

pub type Result<T> = std::result::Result<T, Error>;
