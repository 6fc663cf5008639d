//! Storage traits and error types
//!
//! This module defines the trait interface for metadata sinks and the
//! associated error types.

use crate::storage::PageMetadataRecord;
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A durable destination for the metadata snapshot
///
/// Implementations receive the complete URL -> record mapping and must persist
/// it in one write, so a reader never observes a half-written snapshot.
#[async_trait]
pub trait MetadataSink: Send + Sync {
    /// Persists the full mapping, replacing any previous snapshot
    async fn write_snapshot(
        &self,
        records: &BTreeMap<String, PageMetadataRecord>,
    ) -> StorageResult<()>;

    /// Human-readable location of the snapshot, used in log lines
    fn describe(&self) -> String;
}
