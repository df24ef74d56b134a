//! Content extraction: stored file + media kind -> plain text.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use learnsync_extractors::{transcription_kind, ExtractedContent, Extractor};

use crate::remote::{RemoteOutcome, RemoteTextService};
use crate::traits::BlobStore;
use crate::types::MediaKind;

/// Default yield a local PDF parse must exceed to skip remote extraction.
pub const DEFAULT_PDF_MIN_TEXT_CHARS: usize = 200;

/// Turns stored uploads into text.
///
/// PDFs are parsed locally first and only sent to the remote service when
/// the local yield is too low. Images, audio and video always go remote.
/// Extraction never fails: remote failures become an explanatory text and
/// local parse failures count as zero yield.
#[derive(Clone)]
pub struct ContentExtractor {
    local_pdf: Arc<dyn Extractor>,
    remote: RemoteTextService,
    blobs: Arc<dyn BlobStore>,
    pdf_min_text_chars: usize,
}

impl ContentExtractor {
    pub fn new(
        local_pdf: Arc<dyn Extractor>,
        remote: RemoteTextService,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            local_pdf,
            remote,
            blobs,
            pdf_min_text_chars: DEFAULT_PDF_MIN_TEXT_CHARS,
        }
    }

    /// Set the local PDF yield threshold.
    pub fn with_pdf_min_text_chars(mut self, chars: usize) -> Self {
        self.pdf_min_text_chars = chars;
        self
    }

    /// Extract text from a stored file. `None` means nothing was recovered.
    pub async fn extract(&self, path: &Path, kind: MediaKind) -> Option<String> {
        match kind {
            MediaKind::Pdf => self.extract_pdf(path).await,
            MediaKind::Image => self.extract_image(path).await,
            MediaKind::Audio | MediaKind::Video => {
                let kind = transcription_kind(path);
                let outcome = self.remote.extract_uploaded(path, kind).await;
                explain(outcome)
            }
        }
    }

    async fn extract_pdf(&self, path: &Path) -> Option<String> {
        let local = self.parse_pdf_locally(path).await;
        let local_chars = local.as_ref().map_or(0, ExtractedContent::char_len);
        let local_text = local
            .map(|content| content.text.trim().to_string())
            .filter(|text| !text.is_empty());

        if local_chars > self.pdf_min_text_chars {
            debug!(chars = local_chars, "Local PDF parse sufficient");
            return local_text;
        }

        info!(
            path = %path.display(),
            chars = local_chars,
            "Low text yield from local PDF parse, attempting remote extraction"
        );
        if let RemoteOutcome::Ok(text) = self.remote.extract_uploaded(path, MediaKind::Pdf).await {
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }

        local_text
    }

    /// Local parse result; any failure counts as no text.
    async fn parse_pdf_locally(&self, path: &Path) -> Option<ExtractedContent> {
        let bytes = match self.blobs.read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read stored PDF");
                return None;
            }
        };

        match self.local_pdf.extract(&bytes).await {
            Ok(content) => {
                debug!(
                    extractor = self.local_pdf.name(),
                    pages = content.page_count,
                    bytes = bytes.len(),
                    "Parsed stored PDF"
                );
                Some(content)
            }
            Err(e) => {
                warn!(
                    extractor = self.local_pdf.name(),
                    error = %e,
                    "Local PDF parse failed"
                );
                None
            }
        }
    }

    async fn extract_image(&self, path: &Path) -> Option<String> {
        match self.blobs.read(path).await {
            Ok(bytes) => explain(self.remote.ocr_bytes(&bytes).await),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read stored image");
                Some(format!("Extraction failed: {}", e))
            }
        }
    }
}

/// Successful text is trimmed (empty becomes `None`); a degraded call
/// becomes an explanatory text.
fn explain(outcome: RemoteOutcome<String>) -> Option<String> {
    match outcome {
        RemoteOutcome::Ok(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        RemoteOutcome::Degraded(reason) => Some(format!("Extraction failed: {}", reason)),
    }
}
