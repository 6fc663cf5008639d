//! Crawl engine - main traversal logic
//!
//! This module contains the loop that coordinates a harvest:
//! - Claiming URLs in the visited set before any I/O
//! - Fetching, mirroring and recording each page
//! - Pacing with the politeness delay
//! - Descending into extracted links depth-first
//! - Flushing metadata and reporting at the end of the run

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{FetchedPage, HttpFetcher, PageFetcher};
use crate::crawler::parser::{LinkExtractor, ParsedPage};
use crate::crawler::path_mapper::PathMapper;
use crate::output::CrawlReport;
use crate::state::CrawlState;
use crate::storage::{write_page, JsonFileSink, MetadataStore, PageMetadataRecord};
use crate::HarvestError;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use url::Url;

/// Owns all state of one crawl run
///
/// The visited set, the failure map and the metadata store live here and
/// nowhere else, so independent engines never share state.
pub struct CrawlEngine<F: PageFetcher = HttpFetcher> {
    config: CrawlConfig,
    fetcher: F,
    mapper: PathMapper,
    extractor: LinkExtractor,
    state: CrawlState,
    metadata: MetadataStore,
}

impl CrawlEngine<HttpFetcher> {
    /// Creates an engine that fetches over HTTP and writes `metadata.json`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: CrawlConfig) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: PageFetcher> CrawlEngine<F> {
    /// Creates an engine with a custom fetcher
    pub fn with_fetcher(config: CrawlConfig, fetcher: F) -> Self {
        let sink = JsonFileSink::new(config.metadata_path());
        Self::with_parts(config, fetcher, MetadataStore::new(Box::new(sink)))
    }

    /// Creates an engine with a custom fetcher and metadata store
    pub fn with_parts(config: CrawlConfig, fetcher: F, metadata: MetadataStore) -> Self {
        Self {
            mapper: PathMapper::new(&config),
            extractor: LinkExtractor::from_config(&config),
            config,
            fetcher,
            state: CrawlState::new(),
            metadata,
        }
    }

    /// Runs the crawl from the configured base URL
    ///
    /// Traverses every reachable same-domain page, flushes the metadata
    /// snapshot and returns the summary. Any error other than a per-URL fetch
    /// failure is logged and returned; the snapshot is not flushed in that case.
    pub async fn run(&mut self) -> Result<CrawlReport, HarvestError> {
        let started = Instant::now();
        tracing::info!("Starting harvest from: {}", self.config.base_url());

        match self.harvest().await {
            Ok(()) => {
                let report = CrawlReport::from_run(&self.state, &self.metadata, started.elapsed());
                report.log_summary();
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Harvest failed: {}", e);
                Err(e)
            }
        }
    }

    async fn harvest(&mut self) -> Result<(), HarvestError> {
        let root = self.config.output_root().to_path_buf();
        ensure_directory(&root).await?;

        let seed = self.config.base_url().clone();
        self.process_page(seed).await?;

        self.metadata.flush().await?;
        Ok(())
    }

    /// Processes `url` and everything reachable from it
    ///
    /// Traversal is depth-first in the order links appear on each page. An
    /// explicit stack replaces recursion, so depth is bounded by memory rather
    /// than the call stack. Revisiting a URL is a no-op.
    pub async fn process_page(&mut self, url: Url) -> Result<(), HarvestError> {
        let mut pending = vec![url];

        while let Some(next) = pending.pop() {
            let links = self.visit(&next).await?;

            // Reversed so the first link on the page is popped first.
            let state = &self.state;
            pending.extend(
                links
                    .into_iter()
                    .rev()
                    .filter(|link| !state.is_visited(link.as_str())),
            );
        }

        Ok(())
    }

    /// Downloads a single URL and returns the links to descend into
    async fn visit(&mut self, url: &Url) -> Result<Vec<Url>, HarvestError> {
        let key = url.as_str();
        if !self.state.begin(key) {
            return Ok(Vec::new());
        }

        tracing::info!("Processing: {}", url);

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Failed to download {}: {}", url, e);
                self.state.mark_failed(key, e.to_string())?;
                return Ok(Vec::new());
            }
        };

        let (html, links) = self.digest(&page, url);

        let local_path = self.mapper.map(url);
        write_page(&local_path, &html).await?;

        self.metadata.record(
            key,
            PageMetadataRecord {
                original_url: key.to_string(),
                local_path: local_path.display().to_string(),
                downloaded_at: Utc::now(),
                status_code: page.status_code,
                content_type: page.content_type,
            },
        );
        self.state.mark_downloaded(key)?;

        let delay = self.config.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        Ok(links)
    }

    /// Parses the body into its serialized form and its followable links
    ///
    /// The parsed tree is dropped before returning; it never lives across an
    /// await point.
    fn digest(&self, page: &FetchedPage, url: &Url) -> (String, Vec<Url>) {
        let parsed = ParsedPage::parse(&page.body);
        let links = self.extractor.extract(&parsed, url);
        tracing::debug!("Found {} followable links on {}", links.len(), url);
        (parsed.to_html(), links)
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Visited set and failures of the current run
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Metadata records collected so far
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }
}

async fn ensure_directory(path: &Path) -> Result<(), HarvestError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| HarvestError::Filesystem {
            path: path.to_path_buf(),
            source,
        })
}
