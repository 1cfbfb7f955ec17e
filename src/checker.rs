use std::path::Path;

use crate::config::CheckerConfig;
use crate::crawler::{FolderCrawler, ResourceFilter};
use crate::error::{Error, Result};
use crate::explorer::{CheckReport, MetadataExplorer};

/// Crawls a folder and checks every matching image for a legal mention.
///
/// ```rust,no_run
/// use legal_mentions::checker::LegalMentionsChecker;
/// use std::path::Path;
///
/// let checker = LegalMentionsChecker::new("png|PNG")?;
/// let report = checker.look_in(Path::new("./assets"), "© Orange 2019")?;
/// for file in report.unsuitable() {
///     println!("missing mention: {}", file.path.display());
/// }
/// # Ok::<(), legal_mentions::Error>(())
/// ```
#[derive(Debug)]
pub struct LegalMentionsChecker {
    crawler: FolderCrawler,
    explorer: MetadataExplorer,
}

impl LegalMentionsChecker {
    /// Checker keeping the files whose name matches `filter`, e.g. `"png|PNG"`.
    pub fn new(filter: &str) -> Result<Self> {
        Ok(Self::with_crawler(FolderCrawler::new(ResourceFilter::new(filter)?)))
    }

    pub fn from_config(config: &CheckerConfig) -> Result<Self> {
        Ok(Self::with_crawler(config.crawler()?))
    }

    pub fn with_crawler(crawler: FolderCrawler) -> Self {
        Self {
            crawler,
            explorer: MetadataExplorer::new(),
        }
    }

    pub fn with_explorer(mut self, explorer: MetadataExplorer) -> Self {
        self.explorer = explorer;
        self
    }

    pub fn filter(&self) -> &ResourceFilter {
        self.crawler.filter()
    }

    /// Crawl `folder` and check every matching file for `mention`.
    pub fn look_in(&self, folder: &Path, mention: &str) -> Result<CheckReport> {
        let files = self.crawler.crawl(folder)?;
        log::info!("Found {} file(s) matching '{}'", files.len(), self.filter());
        Ok(self.explorer.explore(&files, mention))
    }

    /// True if every matching file under `folder` carries `mention`.
    ///
    /// A folder without any matching file passes.
    pub fn run(&self, folder: &Path, mention: &str) -> Result<bool> {
        Ok(self.look_in(folder, mention)?.all_suitable())
    }
}

/// Validate the run arguments before anything is crawled.
///
/// The folder must be given and exist, the mention must not be empty.
pub fn preflight(folder: &str, mention: &str) -> Result<()> {
    if folder.is_empty() {
        return Err(Error::EmptyArgument("folder"));
    }
    if !Path::new(folder).exists() {
        return Err(Error::FolderNotFound(folder.into()));
    }
    if mention.is_empty() {
        return Err(Error::EmptyArgument("mention"));
    }
    Ok(())
}

/// Check `folder` for `mention` in the files matching `filter`.
pub fn run(folder: &Path, filter: &str, mention: &str) -> Result<bool> {
    LegalMentionsChecker::new(filter)?.run(folder, mention)
}
