//! Factory for wiring the services from configuration.

use std::sync::Arc;

use learnsync_core::config::AppConfig;
use learnsync_core::error::LearnSyncResult;
use learnsync_core::traits::TextProvider;
use learnsync_core::{
    Authenticator, ContentExtractor, InMemoryDerivationCache, IngestionOrchestrator,
    LocalBlobStore, RemoteTextService, SqliteStore,
};
use learnsync_extractors::PdfExtractor;
use learnsync_llm::ProviderFactory;
use tracing::info;

use crate::state::AppState;

/// Build the application state, creating the configured text provider.
pub fn create_state(config: AppConfig) -> LearnSyncResult<AppState> {
    let provider = ProviderFactory::from_config(&config.llm)?;
    let store = SqliteStore::new(&config.storage.database_path)?;
    create_state_with(config, store, provider)
}

/// Build the application state around an existing store and provider.
pub fn create_state_with(
    config: AppConfig,
    store: SqliteStore,
    provider: Arc<dyn TextProvider>,
) -> LearnSyncResult<AppState> {
    config.validate()?;

    let remote = RemoteTextService::new(provider);
    let blobs = Arc::new(LocalBlobStore::new(config.storage.upload_dir.clone()));
    let local_pdf = Arc::new(PdfExtractor::new());
    let extractor = ContentExtractor::new(local_pdf, remote.clone(), blobs.clone())
        .with_pdf_min_text_chars(config.derivation.pdf_min_text_chars);

    let orchestrator = IngestionOrchestrator::new(
        store.clone(),
        blobs,
        extractor,
        remote.clone(),
        Arc::new(InMemoryDerivationCache::new()),
        config.derivation.clone(),
    );
    let auth = Authenticator::new(store.clone(), config.auth.session_ttl_hours);

    info!(
        model = remote.model_name(),
        upload_dir = %config.storage.upload_dir.display(),
        "Services initialized"
    );
    Ok(AppState::new(orchestrator, auth, store, config))
}
