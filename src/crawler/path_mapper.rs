//! URL to local path mapping
//!
//! Mirrored mode reproduces the URL's directory structure below the output
//! root. Flat mode names each file after a hash of the full URL.

use crate::config::CrawlConfig;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use url::Url;

/// File name used when a URL names a directory
pub const INDEX_FILE: &str = "index.html";

/// Extension given to final segments that have none
pub const HTML_EXTENSION: &str = ".html";

/// Hex digits of the URL hash kept in flat-mode file names
const HASH_NAME_LEN: usize = 16;

/// Maps absolute URLs onto paths under the output root
///
/// Mapping is a pure function of the URL and the configuration; no directory
/// is created here.
///
/// Query strings are not part of the mapping, so URLs differing only in
/// their query land on the same file. In flat mode two distinct URLs can, in
/// principle, share a hash prefix and overwrite each other.
#[derive(Debug, Clone)]
pub struct PathMapper {
    output_root: PathBuf,
    base_path: String,
    preserve_structure: bool,
}

impl PathMapper {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            output_root: config.output_root().to_path_buf(),
            base_path: config.base_path().to_string(),
            preserve_structure: config.preserve_structure(),
        }
    }

    /// Returns the local path a downloaded URL is stored at
    ///
    /// # Examples
    ///
    /// ```
    /// use page_harvester::config::CrawlConfig;
    /// use page_harvester::crawler::PathMapper;
    /// use std::path::Path;
    /// use url::Url;
    ///
    /// let config = CrawlConfig::new("https://example.com/blog/").unwrap();
    /// let mapper = PathMapper::new(&config);
    ///
    /// let url = Url::parse("https://example.com/blog/2024/hello").unwrap();
    /// assert_eq!(
    ///     mapper.map(&url),
    ///     Path::new("downloaded_pages").join("2024").join("hello.html")
    /// );
    /// ```
    pub fn map(&self, url: &Url) -> PathBuf {
        if self.preserve_structure {
            self.mirrored_path(url)
        } else {
            self.hashed_path(url)
        }
    }

    fn mirrored_path(&self, url: &Url) -> PathBuf {
        let relative = self.relative_path(url.path());

        let mut segments: Vec<&str> = relative.trim_start_matches('/').split('/').collect();
        let last = segments.pop().unwrap_or_default();

        let mut path = self.output_root.clone();
        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            path.push(segment);
        }

        if last.is_empty() {
            path.push(INDEX_FILE);
        } else if !last.contains('.') {
            path.push(format!("{}{}", last, HTML_EXTENSION));
        } else {
            path.push(last);
        }

        path
    }

    /// Strips the base path prefix when it matches on a segment boundary
    fn relative_path<'a>(&self, path: &'a str) -> &'a str {
        match path.strip_prefix(self.base_path.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    }

    fn hashed_path(&self, url: &Url) -> PathBuf {
        let digest = Sha256::digest(url.as_str().as_bytes());
        let hash = hex::encode(digest);
        self.output_root
            .join(format!("{}{}", &hash[..HASH_NAME_LEN], HTML_EXTENSION))
    }
}
