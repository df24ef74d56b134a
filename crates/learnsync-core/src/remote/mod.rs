//! Remote text service: the degrade-on-error layer over a [`TextProvider`].
//!
//! Every operation makes exactly one attempt. Provider and parse failures
//! are logged and reported as [`RemoteOutcome::Degraded`] instead of errors,
//! so callers always get a result and decide what placeholder to use.

pub mod prompts;

use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use learnsync_extractors::image::mime_type_or_jpeg;

use crate::json_parser::parse_response;
use crate::traits::{GenerationOptions, TextProvider};
use crate::types::MediaKind;

/// Result of a best-effort remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome<T> {
    /// The provider answered and the answer was usable.
    Ok(T),
    /// The call failed; carries the reason.
    Degraded(String),
}

impl<T> RemoteOutcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, RemoteOutcome::Degraded(_))
    }

    /// The value, if the call succeeded.
    pub fn ok(self) -> Option<T> {
        match self {
            RemoteOutcome::Ok(value) => Some(value),
            RemoteOutcome::Degraded(_) => None,
        }
    }

    /// The value, or `default` if the call degraded.
    pub fn unwrap_or(self, default: T) -> T {
        self.ok().unwrap_or(default)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteOutcome<U> {
        match self {
            RemoteOutcome::Ok(value) => RemoteOutcome::Ok(f(value)),
            RemoteOutcome::Degraded(reason) => RemoteOutcome::Degraded(reason),
        }
    }
}

/// Capability-typed client over a generative provider.
#[derive(Clone)]
pub struct RemoteTextService {
    provider: Arc<dyn TextProvider>,
}

impl RemoteTextService {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self { provider }
    }

    /// Model behind this service.
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// OCR an image sent inline.
    pub async fn ocr_bytes(&self, image: &[u8]) -> RemoteOutcome<String> {
        let mime_type = mime_type_or_jpeg(image);
        debug!(mime_type, bytes = image.len(), "Remote OCR");

        match self
            .provider
            .generate_from_bytes(prompts::OCR_INSTRUCTION, image, mime_type)
            .await
        {
            Ok(text) => RemoteOutcome::Ok(text),
            Err(e) => degrade("ocr", e.to_string()),
        }
    }

    /// Upload a stored file and extract its text (pdf) or transcript (audio/video).
    pub async fn extract_uploaded(&self, path: &Path, kind: MediaKind) -> RemoteOutcome<String> {
        let instruction = match kind {
            MediaKind::Pdf => prompts::PDF_INSTRUCTION,
            MediaKind::Audio | MediaKind::Video => prompts::TRANSCRIPTION_INSTRUCTION,
            MediaKind::Image => prompts::OCR_INSTRUCTION,
        };
        debug!(path = %path.display(), media_kind = %kind, "Remote file extraction");

        match self
            .provider
            .generate_from_file(instruction, path, kind.upload_mime_type())
            .await
        {
            Ok(text) => RemoteOutcome::Ok(text),
            Err(e) => degrade("extract_uploaded", e.to_string()),
        }
    }

    /// Issue a prompt and parse the (possibly fenced) JSON answer as `T`.
    pub async fn generate_structured<T: DeserializeOwned>(&self, prompt: &str) -> RemoteOutcome<T> {
        let response = match self
            .provider
            .generate(prompt, Some(GenerationOptions::json()))
            .await
        {
            Ok(response) => response,
            Err(e) => return degrade("generate_structured", e.to_string()),
        };

        match parse_response::<T>(&response) {
            Ok(value) => RemoteOutcome::Ok(value),
            Err(e) => degrade("generate_structured", e.to_string()),
        }
    }
}

fn degrade<T>(operation: &'static str, reason: String) -> RemoteOutcome<T> {
    warn!(operation, reason = %reason, "Remote call degraded");
    RemoteOutcome::Degraded(reason)
}
