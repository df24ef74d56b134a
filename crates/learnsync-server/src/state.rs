//! Server state management.

use std::sync::Arc;

use learnsync_core::config::AppConfig;
use learnsync_core::{Authenticator, IngestionOrchestrator, SqliteStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<IngestionOrchestrator>,
    pub auth: Authenticator,
    pub store: SqliteStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state from already-built services.
    pub fn new(
        orchestrator: IngestionOrchestrator,
        auth: Authenticator,
        store: SqliteStore,
        config: AppConfig,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            auth,
            store,
            config: Arc::new(config),
        }
    }
}
