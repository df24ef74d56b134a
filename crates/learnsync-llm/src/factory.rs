//! Factory for creating text providers.

use std::sync::Arc;

use learnsync_core::config::{LlmProvider, LlmProviderConfig};
use learnsync_core::error::LearnSyncResult;
use learnsync_core::traits::{LlmConfig, TextProvider};

use crate::gemini::GeminiProvider;

/// Factory for creating text providers.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a text provider from the given configuration.
    pub fn create(
        provider: LlmProvider,
        config: LlmConfig,
    ) -> LearnSyncResult<Arc<dyn TextProvider>> {
        match provider {
            LlmProvider::Gemini => {
                let provider = GeminiProvider::new(config)?;
                Ok(Arc::new(provider))
            }
        }
    }

    /// Create the provider described by an application config section.
    pub fn from_config(config: &LlmProviderConfig) -> LearnSyncResult<Arc<dyn TextProvider>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create a Gemini provider with default configuration.
    pub fn gemini() -> LearnSyncResult<Arc<dyn TextProvider>> {
        Self::create(LlmProvider::Gemini, LlmConfig::default())
    }

    /// Create a Gemini provider with a specific model.
    pub fn gemini_with_model(model: impl Into<String>) -> LearnSyncResult<Arc<dyn TextProvider>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::Gemini, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_model() {
        let mut config = LlmProviderConfig::default();
        config.config.model = "gemini-2.0-flash".to_string();
        config.config.api_key = Some("test-key".to_string());

        let provider = ProviderFactory::from_config(&config).unwrap();
        assert_eq!(provider.model_name(), "gemini-2.0-flash");
    }
}
