//! Document types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use learnsync_extractors::MediaKind;

/// Detected language of a document's text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Arabic.
    Ar,
    /// English.
    #[default]
    En,
}

impl Language {
    /// Phrase appended to prompts so the model answers in this language.
    pub fn instruction(&self) -> &'static str {
        match self {
            Language::Ar => "in Arabic",
            Language::En => "in English",
        }
    }
}

/// A key concept extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConcept {
    pub term: String,
    pub definition: String,
}

impl KeyConcept {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// An uploaded document and its derived analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    /// Filename as the client sent it.
    pub filename: String,
    /// Name under which the bytes are stored (and served below `/static`).
    pub stored_name: String,
    /// Location of the stored bytes on the server.
    #[serde(skip)]
    pub file_path: String,
    pub upload_date: DateTime<Utc>,
    #[serde(rename = "media_type")]
    pub media_kind: MediaKind,
    pub extracted_text: Option<String>,
    pub language: Language,
    pub summary: Option<String>,
    pub key_concepts: Option<Vec<KeyConcept>>,
    pub owner_id: i64,
    pub course_id: Option<i64>,
}

impl Document {
    /// Extracted text, if any non-whitespace text exists.
    pub fn text(&self) -> Option<&str> {
        self.extracted_text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Fields for inserting a freshly uploaded document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub stored_name: String,
    pub file_path: String,
    pub media_kind: MediaKind,
    pub extracted_text: Option<String>,
    pub language: Language,
    pub owner_id: i64,
    pub course_id: Option<i64>,
}

/// Result of the analyze operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub id: i64,
    pub summary: String,
    pub key_concepts: Vec<KeyConcept>,
}

/// Pagination window for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_language_forms() {
        assert_eq!(Language::Ar.to_string(), "ar");
        assert_eq!(Language::from_str("en").unwrap(), Language::En);
        assert_eq!(Language::default(), Language::En);
        assert_eq!(Language::Ar.instruction(), "in Arabic");
    }

    #[test]
    fn test_document_serializes_media_type_and_hides_path() {
        let doc = Document {
            id: 1,
            filename: "notes.pdf".to_string(),
            stored_name: "abc_notes.pdf".to_string(),
            file_path: "/srv/uploads/abc_notes.pdf".to_string(),
            upload_date: Utc::now(),
            media_kind: MediaKind::Pdf,
            extracted_text: Some("  ".to_string()),
            language: Language::En,
            summary: None,
            key_concepts: None,
            owner_id: 7,
            course_id: None,
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["media_type"], "pdf");
        assert!(value.get("file_path").is_none());
        assert!(doc.text().is_none());
    }
}
