//! Local filesystem blob storage for uploads.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::error::{LearnSyncError, LearnSyncResult};
use crate::traits::BlobStore;

/// Build a collision-free storage name for an uploaded file.
///
/// Only the final path component of the client's filename is kept, and every
/// character outside `[A-Za-z0-9._-]` becomes `_`, so the name can never
/// escape the upload directory.
pub fn storage_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        sanitized = "upload".to_string();
    }

    format!("{}_{}", Uuid::new_v4().simple(), sanitized)
}

/// Stores blobs as files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the stored files.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> LearnSyncResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(LearnSyncError::validation(format!(
                "Invalid storage name '{}'",
                name
            )));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| LearnSyncError::storage(format!("Failed to create upload dir: {}", e)))?;

        let path = self.root.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| LearnSyncError::storage(format!("Failed to write {}: {}", name, e)))?;

        debug!(path = %path.display(), bytes = bytes.len(), "Stored upload");
        Ok(path)
    }

    async fn read(&self, path: &Path) -> LearnSyncResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| LearnSyncError::Storage {
            message: format!("Failed to read {}: {}", path.display(), e),
            code: crate::error::ErrorCode::StoReadFailed,
        })
    }

    async fn remove(&self, path: &Path) -> LearnSyncResult<()> {
        tokio::fs::remove_file(path).await.map_err(|e| {
            LearnSyncError::storage(format!("Failed to remove {}: {}", path.display(), e))
        })
    }
}
