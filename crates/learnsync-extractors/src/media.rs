//! Media classification for uploaded files.
//!
//! The declared content type wins; the filename extension is only consulted
//! when the content type is missing or not recognized.

use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::types::MediaKind;

/// Recognized content types.
const CONTENT_TYPES: &[(&str, MediaKind)] = &[
    ("application/pdf", MediaKind::Pdf),
    ("audio/mpeg", MediaKind::Audio),
    ("audio/mp3", MediaKind::Audio),
    ("audio/wav", MediaKind::Audio),
    ("audio/x-wav", MediaKind::Audio),
    ("video/mp4", MediaKind::Video),
    ("image/jpeg", MediaKind::Image),
    ("image/png", MediaKind::Image),
];

/// Recognized filename extensions (lowercase, without the dot).
const EXTENSIONS: &[(&str, MediaKind)] = &[
    ("pdf", MediaKind::Pdf),
    ("mp3", MediaKind::Audio),
    ("wav", MediaKind::Audio),
    ("mp4", MediaKind::Video),
    ("jpg", MediaKind::Image),
    ("jpeg", MediaKind::Image),
    ("png", MediaKind::Image),
];

/// Classify an upload from its declared content type, falling back to the
/// filename extension.
pub fn classify(content_type: Option<&str>, filename: &str) -> ExtractResult<MediaKind> {
    if let Some(kind) = content_type.and_then(kind_for_content_type) {
        return Ok(kind);
    }

    kind_for_extension(filename).ok_or_else(|| {
        ExtractError::UnsupportedType(
            content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or(filename)
                .to_string(),
        )
    })
}

/// Look up a declared content type, ignoring parameters and case.
pub fn kind_for_content_type(content_type: &str) -> Option<MediaKind> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    CONTENT_TYPES
        .iter()
        .find(|(ct, _)| *ct == essence)
        .map(|(_, kind)| *kind)
}

/// Look up a filename extension, case-insensitively.
pub fn kind_for_extension(filename: &str) -> Option<MediaKind> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();

    EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, kind)| *kind)
}

/// Decide whether a stored recording is transcribed as video or audio.
///
/// Only the `.mp4` extension marks video; every other recording is audio.
pub fn transcription_kind(path: &Path) -> MediaKind {
    let is_mp4 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("mp4"))
        .unwrap_or(false);

    if is_mp4 {
        MediaKind::Video
    } else {
        MediaKind::Audio
    }
}
