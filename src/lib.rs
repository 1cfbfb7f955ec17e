//! # legal-mentions
//!
//! Make sure every image asset of a project carries its copyright / legal
//! mention in embedded metadata.
//!
//! The checker walks a folder, keeps the files whose name matches a filter
//! (`png|PNG` by default) and reads each file's metadata. A file is
//! *suitable* when one of these fields equals the expected mention exactly:
//!
//! | Group | Field |
//! |-------|-------|
//! | TIFF | `Copyright` |
//! | IPTC | `CopyrightNotice` |
//! | PNG | `Copyright` |
//!
//! The run passes when every file is suitable. A folder without any
//! matching file passes as well.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use legal_mentions::checker::LegalMentionsChecker;
//! use std::path::Path;
//!
//! fn main() -> legal_mentions::Result<()> {
//!     let checker = LegalMentionsChecker::new("png|PNG")?;
//!     let ok = checker.run(Path::new("./Assets.xcassets"), "© Orange 2019")?;
//!     println!("all files suitable: {ok}");
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! ```rust,no_run
//! use legal_mentions::crawler::{crawl, ResourceFilter};
//! use legal_mentions::explorer::MetadataExplorer;
//! use std::path::Path;
//!
//! fn main() -> legal_mentions::Result<()> {
//!     let files = crawl(Path::new("./assets"), &ResourceFilter::new(r"\.png$")?)?;
//!     let explorer = MetadataExplorer::new();
//!     for file in &files {
//!         println!("{}: {}", file.display(), explorer.check_one(file, "© Orange 2019"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`crawler`] — recursive folder walk with a regex file filter
//! - [`metadata`] — metadata groups and the image decoder
//! - [`explorer`] — per-file and aggregate mention checks
//! - [`checker`] — crawl + explore orchestration
//! - [`config`] — JSON configuration

pub mod checker;
pub mod config;
pub mod crawler;
pub mod error;
pub mod explorer;
pub mod metadata;

pub use error::{DecodeError, Error, Result};
