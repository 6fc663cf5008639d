//! Writing downloaded page bodies into the mirror

use crate::HarvestError;
use std::path::Path;

/// Writes a page body to `path`, creating parent directories first
///
/// Directories are created on every call, immediately before the write.
pub async fn write_page(path: &Path, body: &str) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| HarvestError::Filesystem {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
    }

    tokio::fs::write(path, body)
        .await
        .map_err(|source| HarvestError::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!("Wrote {} bytes to {}", body.len(), path.display());
    Ok(())
}
