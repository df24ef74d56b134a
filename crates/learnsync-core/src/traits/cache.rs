//! Derivation cache trait.

use async_trait::async_trait;

use crate::types::DocumentAnalysis;

/// A cached analysis together with the user it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnalysis {
    pub owner_id: i64,
    pub analysis: DocumentAnalysis,
}

/// Memoizes analysis results per document.
///
/// Implementations must replace entries atomically so concurrent writers
/// never leave a torn value behind.
#[async_trait]
pub trait DerivationCache: Send + Sync {
    /// Look up the cached analysis for a document.
    async fn get(&self, document_id: i64) -> Option<CachedAnalysis>;

    /// Store (or replace) the analysis for a document.
    async fn set(&self, document_id: i64, entry: CachedAnalysis);

    /// Drop the entry for a document, if any.
    async fn invalidate(&self, document_id: i64);

    /// Drop every entry.
    async fn clear(&self);

    /// Number of cached entries.
    async fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
