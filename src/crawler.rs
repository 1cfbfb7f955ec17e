use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Default filter: PNG assets, whatever the extension case.
pub const DEFAULT_FILTER: &str = "png|PNG";

// DEFAULT_FILTER is a constant, valid pattern; covered by `filter_default`.
static DEFAULT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_FILTER).expect("DEFAULT_FILTER is a valid regex"));

/// Regular expression selecting the files to check, searched in the file name.
///
/// The pattern is not anchored: `png|PNG` keeps `logo.png` and `LOGO.PNG`.
/// Anchor it yourself (`\.png$`) for a stricter match.
///
/// ```rust
/// use legal_mentions::crawler::ResourceFilter;
///
/// let filter = ResourceFilter::new("png|PNG").unwrap();
/// assert!(filter.matches("logo.png"));
/// assert!(!filter.matches("notes.txt"));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceFilter {
    regex: Regex,
}

impl ResourceFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.matches(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

impl Default for ResourceFilter {
    fn default() -> Self {
        Self {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}

impl fmt::Display for ResourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recursive folder walker returning the files accepted by a [`ResourceFilter`].
#[derive(Debug, Clone)]
pub struct FolderCrawler {
    filter: ResourceFilter,
    follow_links: bool,
    max_depth: Option<usize>,
}

impl FolderCrawler {
    pub fn new(filter: ResourceFilter) -> Self {
        Self {
            filter,
            follow_links: false,
            max_depth: None,
        }
    }

    /// Descend into symlinked directories too.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    /// Limit the descent; depth 1 is the root's direct children.
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn filter(&self) -> &ResourceFilter {
        &self.filter
    }

    /// Collect every file under `root` whose name matches the filter.
    ///
    /// Directories are always descended into and never returned. The result
    /// is sorted and free of duplicates. Entries that cannot be read are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`Error::FolderNotFound`] if `root` does not exist,
    /// [`Error::NotADirectory`] if it is not a directory.
    pub fn crawl(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(Error::FolderNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }

        let mut walker = WalkDir::new(root).follow_links(self.follow_links);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            // Symlinked files count as files even when links are not followed
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            if self.filter.matches_path(entry.path()) {
                files.push(entry.into_path());
            } else {
                log::debug!("Filtered out: {}", entry.path().display());
            }
        }

        files.sort();
        files.dedup();
        log::debug!(
            "Crawled {}: {} file(s) matching '{}'",
            root.display(),
            files.len(),
            self.filter
        );
        Ok(files)
    }
}

/// Shorthand for `FolderCrawler::new(filter).crawl(root)`.
pub fn crawl(root: &Path, filter: &ResourceFilter) -> Result<Vec<PathBuf>> {
    FolderCrawler::new(filter.clone()).crawl(root)
}
