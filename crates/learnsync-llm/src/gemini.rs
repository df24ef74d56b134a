//! Google Gemini provider implementation.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use learnsync_core::error::{LearnSyncError, LearnSyncResult};
use learnsync_core::traits::{GenerationOptions, LlmConfig, ResponseFormat, TextProvider};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";

/// Gemini provider over the Generative Language REST API.
pub struct GeminiProvider {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
            file_data: None,
        }
    }

    fn inline(data: &[u8], mime_type: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: BASE64.encode(data),
            }),
            file_data: None,
        }
    }

    fn file(file: &RemoteFile) -> Self {
        Self {
            text: None,
            inline_data: None,
            file_data: Some(FileData {
                mime_type: file.mime_type.clone(),
                file_uri: file.uri.clone(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: RemoteFile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteFile {
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    state: Option<String>,
}

impl RemoteFile {
    fn is_processing(&self) -> bool {
        self.state.as_deref() == Some("PROCESSING")
    }

    fn is_failed(&self) -> bool {
        self.state.as_deref() == Some("FAILED")
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(config: LlmConfig) -> LearnSyncResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                LearnSyncError::Configuration("Gemini API key not found. Set GEMINI_API_KEY environment variable or provide api_key in config.".to_string())
            })?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            api_key.parse().map_err(|_| {
                LearnSyncError::Configuration("Invalid API key format".to_string())
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                LearnSyncError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| GEMINI_API_URL.to_string());
        Url::parse(&base_url).map_err(|e| {
            LearnSyncError::Configuration(format!("Invalid base URL '{}': {}", base_url, e))
        })?;

        let mut config = config;
        if config.model.is_empty() {
            config.model = LlmConfig::default().model;
        }

        Ok(Self {
            client,
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn generation_config(&self, options: GenerationOptions) -> GenerationConfig {
        GenerationConfig {
            temperature: options.temperature.unwrap_or(self.config.temperature),
            max_output_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
            response_mime_type: match options.response_format {
                Some(ResponseFormat::Json) => Some("application/json"),
                _ => None,
            },
        }
    }

    async fn generate_parts(
        &self,
        parts: Vec<Part>,
        options: Option<GenerationOptions>,
    ) -> LearnSyncResult<String> {
        let request = GenerateRequest {
            contents: vec![Content { parts }],
            generation_config: self.generation_config(options.unwrap_or_default()),
        };

        let response = self
            .client
            .post(format!(
                "{}/{}/models/{}:generateContent",
                self.base_url, API_VERSION, self.config.model
            ))
            .json(&request)
            .send()
            .await
            .map_err(|e| LearnSyncError::network(format!("Gemini API request failed: {}", e)))?;

        let body = read_body(response).await?;
        let response: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            LearnSyncError::llm_invalid_response(format!("Failed to parse response: {}", e))
        })?;

        response_text(response)
    }

    /// Upload a file with the raw upload protocol and wait until it is usable.
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn upload_file(&self, path: &Path, mime_type: &str) -> LearnSyncResult<RemoteFile> {
        let data = tokio::fs::read(path).await?;

        let response = self
            .client
            .post(format!("{}/upload/{}/files", self.base_url, API_VERSION))
            .header("X-Goog-Upload-Protocol", "raw")
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(data)
            .send()
            .await
            .map_err(|e| LearnSyncError::network(format!("Gemini file upload failed: {}", e)))?;

        let body = read_body(response).await?;
        let mut file = serde_json::from_str::<UploadResponse>(&body)
            .map_err(|e| {
                LearnSyncError::llm_invalid_response(format!("Failed to parse upload: {}", e))
            })?
            .file;
        debug!(name = %file.name, state = ?file.state, "Uploaded file");

        let interval = Duration::from_millis(self.config.file_poll_interval_ms);
        let mut attempts = 0;
        while file.is_processing() {
            if attempts >= self.config.file_poll_attempts {
                return Err(LearnSyncError::llm(format!(
                    "File {} still processing after {} checks",
                    file.name, attempts
                )));
            }
            attempts += 1;
            tokio::time::sleep(interval).await;
            file = self.get_file(&file.name).await?;
        }

        if file.is_failed() {
            return Err(LearnSyncError::llm(format!(
                "Provider failed to process file {}",
                file.name
            )));
        }
        if file.mime_type.is_empty() {
            file.mime_type = mime_type.to_string();
        }
        Ok(file)
    }

    async fn get_file(&self, name: &str) -> LearnSyncResult<RemoteFile> {
        let response = self
            .client
            .get(format!("{}/{}/{}", self.base_url, API_VERSION, name))
            .send()
            .await
            .map_err(|e| LearnSyncError::network(format!("Gemini file lookup failed: {}", e)))?;

        let body = read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            LearnSyncError::llm_invalid_response(format!("Failed to parse file: {}", e))
        })
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    async fn generate(
        &self,
        prompt: &str,
        options: Option<GenerationOptions>,
    ) -> LearnSyncResult<String> {
        self.generate_parts(vec![Part::text(prompt)], options).await
    }

    async fn generate_from_bytes(
        &self,
        prompt: &str,
        data: &[u8],
        mime_type: &str,
    ) -> LearnSyncResult<String> {
        let parts = vec![Part::text(prompt), Part::inline(data, mime_type)];
        self.generate_parts(parts, None).await
    }

    async fn generate_from_file(
        &self,
        prompt: &str,
        path: &Path,
        mime_type: &str,
    ) -> LearnSyncResult<String> {
        let file = self.upload_file(path, mime_type).await?;
        let parts = vec![Part::text(prompt), Part::file(&file)];
        self.generate_parts(parts, None).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Body of a successful response, or the API's error message.
async fn read_body(response: Response) -> LearnSyncResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LearnSyncError::network(format!("Failed to read response body: {}", e)))?;

    if !status.is_success() {
        let message = serde_json::from_str::<GeminiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.clone());
        return Err(LearnSyncError::llm(format!(
            "Gemini API error ({}): {}",
            status, message
        )));
    }
    Ok(body)
}

/// Concatenated text parts of the first candidate.
fn response_text(response: GenerateResponse) -> LearnSyncResult<String> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(LearnSyncError::llm(format!("Prompt blocked: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LearnSyncError::llm_invalid_response("Response has no candidates"))?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LearnSyncError::llm_invalid_response(format!(
            "Response has no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }
    Ok(text)
}
