//! In-process derivation cache and single-flight guard.

mod single_flight;

pub use single_flight::SingleFlight;

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::traits::{CachedAnalysis, DerivationCache};

/// Process-lifetime analysis cache backed by a map behind an async RwLock.
///
/// No eviction: entries live until invalidated or cleared.
#[derive(Debug, Default)]
pub struct InMemoryDerivationCache {
    entries: RwLock<HashMap<i64, CachedAnalysis>>,
}

impl InMemoryDerivationCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DerivationCache for InMemoryDerivationCache {
    async fn get(&self, document_id: i64) -> Option<CachedAnalysis> {
        self.entries.read().await.get(&document_id).cloned()
    }

    async fn set(&self, document_id: i64, entry: CachedAnalysis) {
        self.entries.write().await.insert(document_id, entry);
    }

    async fn invalidate(&self, document_id: i64) {
        self.entries.write().await.remove(&document_id);
    }

    async fn clear(&self) {
        self.entries.write().await.clear();
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
