//! Image format sniffing.
//!
//! Remote OCR receives the raw bytes inline, so the MIME type has to match
//! what the bytes actually are rather than what the client declared.

use crate::error::{ExtractError, ExtractResult};

/// Detect an image MIME type from its magic number.
pub fn detect_mime_type(content: &[u8]) -> ExtractResult<&'static str> {
    if content.len() < 8 {
        return Err(ExtractError::Image(
            "Content too short to detect format".to_string(),
        ));
    }

    if content.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        Ok("image/png")
    } else if content.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Ok("image/jpeg")
    } else if content.starts_with(b"GIF87a") || content.starts_with(b"GIF89a") {
        Ok("image/gif")
    } else if content.starts_with(b"RIFF") && content.len() > 12 && &content[8..12] == b"WEBP" {
        Ok("image/webp")
    } else {
        Err(ExtractError::Image("Unknown image format".to_string()))
    }
}

/// Like [`detect_mime_type`], defaulting to JPEG for unrecognized bytes.
pub fn mime_type_or_jpeg(content: &[u8]) -> &'static str {
    detect_mime_type(content).unwrap_or("image/jpeg")
}
