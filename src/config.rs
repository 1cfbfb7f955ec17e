use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::crawler::{DEFAULT_FILTER, FolderCrawler, ResourceFilter};
use crate::error::{Error, Result};

/// Settings of a check run that are not tied to one invocation.
///
/// Loaded from a JSON file; every key is optional.
///
/// ```rust
/// use legal_mentions::config::CheckerConfig;
///
/// let config: CheckerConfig = serde_json::from_str(r#"{ "filter": "\\.png$" }"#).unwrap();
/// assert_eq!(config.filter, "\\.png$");
/// assert!(!config.follow_links);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Regular expression selecting the files to check, searched in the file name.
    pub filter: String,
    /// Descend into symlinked directories.
    pub follow_links: bool,
    /// Maximum folder depth; `None` walks the whole tree.
    pub max_depth: Option<usize>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            follow_links: false,
            max_depth: None,
        }
    }
}

impl CheckerConfig {
    /// Load config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Save config to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, contents)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Build the crawler described by this config.
    pub fn crawler(&self) -> Result<FolderCrawler> {
        let filter = ResourceFilter::new(&self.filter)?;
        Ok(FolderCrawler::new(filter)
            .follow_links(self.follow_links)
            .max_depth(self.max_depth))
    }
}
