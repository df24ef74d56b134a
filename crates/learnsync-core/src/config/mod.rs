//! Configuration system for learnsync.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LearnSyncError, LearnSyncResult};
use crate::traits::LlmConfig;

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
}

/// Provider configuration with type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: LlmProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: LlmConfig,
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            config: LlmConfig::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, uploads included.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 100 * 1024 * 1024,
        }
    }
}

/// Where records and uploaded files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Directory holding uploaded files.
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .map(|h| h.join(".learnsync"))
            .unwrap_or_else(|| PathBuf::from(".learnsync"));

        Self {
            database_path: data_dir.join("learnsync.db"),
            upload_dir: data_dir.join("uploads"),
        }
    }
}

/// Knobs for text extraction and AI derivations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationConfig {
    /// Characters of document text sent with each derivation prompt.
    pub text_budget_chars: usize,
    /// Questions requested per quiz.
    pub quiz_questions: usize,
    /// Cards requested per flashcard deck.
    pub flashcards: usize,
    /// A local PDF parse must yield more than this many characters to skip
    /// remote extraction.
    pub pdf_min_text_chars: usize,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            text_budget_chars: 8000,
            quiz_questions: 5,
            flashcards: 8,
            pdf_min_text_chars: 200,
        }
    }
}

/// Session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Lifetime of an issued access token.
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: 48,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmProviderConfig,
    pub derivation: DerivationConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> LearnSyncResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| LearnSyncError::Configuration(e.to_string())),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| LearnSyncError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| LearnSyncError::Configuration(e.to_string())),
            _ => Err(LearnSyncError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlay environment variables onto this configuration.
    pub fn with_env_overrides(mut self) -> Self {
        // Server
        if let Ok(host) = std::env::var("LEARNSYNC_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("LEARNSYNC_PORT") {
            self.server.port = port;
        }
        if let Some(limit) = env_parse::<usize>("LEARNSYNC_MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = limit;
        }

        // Storage
        if let Ok(path) = std::env::var("LEARNSYNC_DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("LEARNSYNC_UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }

        // LLM
        if let Ok(model) = std::env::var("LEARNSYNC_LLM_MODEL") {
            self.llm.config.model = model;
        }
        if let Ok(api_key) =
            std::env::var("GEMINI_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY"))
        {
            self.llm.config.api_key = Some(api_key);
        }
        if let Ok(base_url) = std::env::var("LEARNSYNC_LLM_BASE_URL") {
            self.llm.config.base_url = Some(base_url);
        }

        self
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> LearnSyncResult<()> {
        if self.server.port == 0 {
            return Err(LearnSyncError::Configuration(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.derivation.text_budget_chars == 0 {
            return Err(LearnSyncError::Configuration(
                "derivation.text_budget_chars must be positive".to_string(),
            ));
        }
        if self.derivation.quiz_questions == 0 || self.derivation.flashcards == 0 {
            return Err(LearnSyncError::Configuration(
                "derivation.quiz_questions and derivation.flashcards must be positive"
                    .to_string(),
            ));
        }
        if self.auth.session_ttl_hours <= 0 {
            return Err(LearnSyncError::Configuration(
                "auth.session_ttl_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring unparsable environment variable");
                None
            }
        },
        Err(_) => None,
    }
}
