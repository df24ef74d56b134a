//! Core types for content extraction.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Classification of an uploaded file, driving which extraction strategy applies.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// PDF document.
    Pdf,
    /// Audio recording (mp3, wav).
    Audio,
    /// Video recording (mp4).
    Video,
    /// Still image (jpeg, png).
    Image,
}

impl MediaKind {
    /// MIME type sent to a remote provider when the file itself is uploaded.
    pub fn upload_mime_type(&self) -> &'static str {
        match self {
            MediaKind::Pdf => "application/pdf",
            MediaKind::Audio => "audio/mpeg",
            MediaKind::Video => "video/mp4",
            MediaKind::Image => "image/jpeg",
        }
    }
}

/// Text recovered by a local extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Extracted plain text.
    pub text: String,

    /// Media kind of the original content.
    pub media_kind: MediaKind,

    /// Number of pages the parser saw, for paged formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
}

impl ExtractedContent {
    pub fn new(text: String, media_kind: MediaKind) -> Self {
        Self {
            text,
            media_kind,
            page_count: None,
        }
    }

    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = Some(page_count);
        self
    }

    /// Length of the trimmed text in characters.
    pub fn char_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}
