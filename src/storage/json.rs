//! JSON file sink for the metadata snapshot

use crate::storage::traits::{MetadataSink, StorageResult};
use crate::storage::PageMetadataRecord;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Writes the snapshot as pretty-printed UTF-8 JSON
///
/// The document is written to a sibling temp file first and then renamed over
/// the target, so the target is either the old snapshot or the new one.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl MetadataSink for JsonFileSink {
    async fn write_snapshot(
        &self,
        records: &BTreeMap<String, PageMetadataRecord>,
    ) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(records)?;
        let temp = self.temp_path();
        fs::write(&temp, json).await?;
        fs::rename(&temp, &self.path).await?;

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
