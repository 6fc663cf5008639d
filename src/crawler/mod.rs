//! Crawler module for page fetching and mirroring
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with user agent rotation
//! - HTML parsing and same-domain link extraction
//! - Mapping URLs onto local file paths
//! - The depth-first crawl engine

mod coordinator;
mod fetcher;
mod parser;
mod path_mapper;
mod user_agent;

pub use coordinator::CrawlEngine;
pub use fetcher::{
    build_http_client, request_headers, FetchError, FetchedPage, HttpFetcher, PageFetcher,
};
pub use parser::{LinkExtractor, LinkSource, ParsedPage};
pub use path_mapper::{PathMapper, HTML_EXTENSION, INDEX_FILE};
pub use user_agent::{RandomSelector, RoundRobinSelector, UserAgentSelector};

use crate::config::CrawlConfig;
use crate::output::CrawlReport;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for mirroring a site. It will:
/// 1. Build the HTTP client
/// 2. Create the output directory
/// 3. Download every reachable same-domain page
/// 4. Write the metadata snapshot
/// 5. Return the run summary
///
/// # Arguments
///
/// * `config` - The validated crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Harvest completed; individual pages may still have failed
/// * `Err(HarvestError)` - Harvest aborted
///
/// # Example
///
/// ```no_run
/// use page_harvester::config::CrawlConfig;
/// use page_harvester::crawler::harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::new("http://quotes.toscrape.com")?;
/// let report = harvest(config).await?;
/// println!("{} pages downloaded", report.downloaded);
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: CrawlConfig) -> Result<CrawlReport, HarvestError> {
    let mut engine = CrawlEngine::new(config)?;
    engine.run().await
}
