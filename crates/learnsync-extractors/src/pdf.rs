//! PDF content extraction using pdf-extract.

use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{ExtractedContent, MediaKind};
use crate::Extractor;
use async_trait::async_trait;

/// Local PDF text extractor using the pdf-extract library.
///
/// Parses page by page and joins non-empty page text with newlines. The
/// parser is synchronous (and may panic on malformed input), so it runs
/// inside spawn_blocking; a panic surfaces as [`ExtractError::TaskJoin`].
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract page texts synchronously (called within spawn_blocking).
    fn extract_pages(content: &[u8]) -> ExtractResult<Vec<String>> {
        pdf_extract::extract_text_from_mem_by_pages(content)
            .map_err(|e| ExtractError::Pdf(format!("Failed to parse PDF: {}", e)))
    }
}

/// Join page texts, skipping pages that produced nothing.
pub(crate) fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|p| p.trim_end())
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedContent> {
        let content = content.to_vec();

        let pages = tokio::task::spawn_blocking(move || Self::extract_pages(&content)).await??;
        let page_count = pages.len();
        let text = join_pages(&pages);

        debug!(page_count, chars = text.chars().count(), "Parsed PDF locally");

        Ok(ExtractedContent::new(text, MediaKind::Pdf).with_page_count(page_count))
    }

    fn supported_kinds(&self) -> &[MediaKind] {
        &[MediaKind::Pdf]
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}
