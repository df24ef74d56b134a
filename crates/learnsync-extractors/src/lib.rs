//! learnsync-extractors - Media classification and local text extraction.
//!
//! Provides the media-kind taxonomy used across learnsync, classification of
//! uploads from content type and filename, image format sniffing for inline
//! OCR payloads, and a local PDF text extractor behind a trait so the
//! ingestion pipeline can swap it out.
//!
//! # Features
//!
//! - `pdf` (default) - PDF text extraction via pdf-extract
//!
//! # Example
//!
//! ```ignore
//! use learnsync_extractors::{classify, Extractor, MediaKind, PdfExtractor};
//!
//! let kind = classify(Some("application/pdf"), "notes.pdf")?;
//! assert_eq!(kind, MediaKind::Pdf);
//!
//! let result = PdfExtractor::new().extract(&pdf_bytes).await?;
//! println!("{}", result.text);
//! ```

mod error;
pub mod image;
pub mod media;
mod types;

#[cfg(feature = "pdf")]
mod pdf;

pub use error::{ExtractError, ExtractResult};
pub use media::{classify, transcription_kind};
pub use types::{ExtractedContent, MediaKind};

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

use async_trait::async_trait;

/// Core Extractor trait - local content extractors implement this.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract text content from bytes.
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedContent>;

    /// Media kinds this extractor handles.
    fn supported_kinds(&self) -> &[MediaKind];

    /// Check if this extractor handles the given media kind.
    fn supports(&self, kind: MediaKind) -> bool {
        self.supported_kinds().contains(&kind)
    }

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}
