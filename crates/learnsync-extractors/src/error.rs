//! Extraction error types.

use thiserror::Error;

/// Errors that can occur while classifying or extracting uploaded media.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Neither the declared content type nor the file extension is recognized.
    #[error("Unsupported file type: {0}. Allowed: PDF, Media (MP3/WAV/MP4), Images (JPG/PNG)")]
    UnsupportedType(String),

    /// Extraction process failed.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// IO error during extraction.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF-specific extraction error.
    #[cfg(feature = "pdf")]
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// Image format could not be determined.
    #[error("Image error: {0}")]
    Image(String),

    /// Task join error from spawn_blocking (includes parser panics).
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
