//! Storage module for persisting crawl output
//!
//! This module handles:
//! - Writing downloaded page bodies into the mirrored directory tree
//! - Accumulating one metadata record per downloaded URL
//! - Flushing the metadata mapping to a durable sink at the end of a run

mod json;
mod pages;
mod traits;

pub use json::JsonFileSink;
pub use pages::write_page;
pub use traits::{MetadataSink, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata about one successfully downloaded page
///
/// Created at download time and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadataRecord {
    pub original_url: String,
    pub local_path: String,
    pub downloaded_at: DateTime<Utc>,
    pub status_code: u16,
    pub content_type: String,
}

/// Collects metadata records for a run and persists them as one snapshot
///
/// Records are keyed by URL in a sorted map, so the snapshot is identical
/// regardless of the order pages completed in.
pub struct MetadataStore {
    records: BTreeMap<String, PageMetadataRecord>,
    sink: Box<dyn MetadataSink>,
}

impl MetadataStore {
    pub fn new(sink: Box<dyn MetadataSink>) -> Self {
        Self {
            records: BTreeMap::new(),
            sink,
        }
    }

    /// Stores a record under `url`, replacing any earlier record for it
    pub fn record(&mut self, url: &str, metadata: PageMetadataRecord) {
        if self.records.insert(url.to_string(), metadata).is_some() {
            tracing::debug!("Replaced existing metadata record for {}", url);
        }
    }

    /// Writes every record to the sink in a single snapshot
    pub async fn flush(&self) -> StorageResult<()> {
        self.sink.write_snapshot(&self.records).await?;
        tracing::info!(
            "Saved metadata for {} pages to {}",
            self.records.len(),
            self.sink.describe()
        );
        Ok(())
    }

    pub fn get(&self, url: &str) -> Option<&PageMetadataRecord> {
        self.records.get(url)
    }

    pub fn records(&self) -> &BTreeMap<String, PageMetadataRecord> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataStore")
            .field("records", &self.records.len())
            .field("sink", &self.sink.describe())
            .finish()
    }
}
