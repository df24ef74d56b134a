//! Blob storage trait.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::LearnSyncResult;

/// Durable storage for uploaded bytes. No deduplication, no content
/// addressing: every save writes a new object.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist bytes under the given name and return where they landed.
    async fn save(&self, name: &str, bytes: &[u8]) -> LearnSyncResult<PathBuf>;

    /// Read back previously saved bytes.
    async fn read(&self, path: &Path) -> LearnSyncResult<Vec<u8>>;

    /// Delete previously saved bytes.
    async fn remove(&self, path: &Path) -> LearnSyncResult<()>;
}
