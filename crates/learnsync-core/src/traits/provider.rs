//! Generative text provider trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::LearnSyncResult;

/// Configuration options for a single generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Response format.
    pub response_format: Option<ResponseFormat>,
}

impl GenerationOptions {
    /// Options asking the provider for a bare JSON payload.
    pub fn json() -> Self {
        Self {
            response_format: Some(ResponseFormat::Json),
            ..Default::default()
        }
    }
}

/// Response format for provider output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Plain text response.
    Text,
    /// JSON response.
    Json,
}

/// Capability interface over a generative AI provider.
///
/// Implementations report failures as errors; the degrade-to-default policy
/// lives one layer up in [`crate::remote::RemoteTextService`].
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text from a prompt.
    async fn generate(
        &self,
        prompt: &str,
        options: Option<GenerationOptions>,
    ) -> LearnSyncResult<String>;

    /// Generate text from a prompt plus an inline binary payload.
    async fn generate_from_bytes(
        &self,
        prompt: &str,
        data: &[u8],
        mime_type: &str,
    ) -> LearnSyncResult<String>;

    /// Upload a file to the provider and generate text referencing it.
    async fn generate_from_file(
        &self,
        prompt: &str,
        path: &Path,
        mime_type: &str,
    ) -> LearnSyncResult<String>;

    /// Get the model name.
    fn model_name(&self) -> &str;
}

/// Provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key (if not using environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// How many times an uploaded file still being processed is polled.
    #[serde(default = "default_file_poll_attempts")]
    pub file_poll_attempts: u32,
    /// Delay between polls of a processing file.
    #[serde(default = "default_file_poll_interval_ms")]
    pub file_poll_interval_ms: u64,
}

fn default_model() -> String {
    "gemini-flash-latest".to_string()
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_file_poll_attempts() -> u32 {
    30
}

fn default_file_poll_interval_ms() -> u64 {
    2000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
            file_poll_attempts: default_file_poll_attempts(),
            file_poll_interval_ms: default_file_poll_interval_ms(),
        }
    }
}
