//! Error types for learnsync operations.
//!
//! This module provides the error hierarchy shared by every layer, with
//! structured error codes and suggestions for resolution.

use std::collections::HashMap;
use thiserror::Error;

use learnsync_extractors::ExtractError;

/// Result type alias for learnsync operations.
pub type LearnSyncResult<T> = Result<T, LearnSyncError>;

/// Main error type for all learnsync operations.
#[derive(Error, Debug)]
pub enum LearnSyncError {
    /// Authentication failed.
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        code: ErrorCode,
    },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
    },

    /// The upload is not a PDF, audio, video or image file.
    #[error("{message}")]
    UnsupportedMedia { message: String, code: ErrorCode },

    /// Record absent or owned by someone else (deliberately indistinguishable).
    #[error("{message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        resource: &'static str,
    },

    /// The record exists but is not in a state that allows the operation.
    #[error("{message}")]
    Precondition { message: String, code: ErrorCode },

    /// Uniqueness constraint violated.
    #[error("Conflict: {message}")]
    Conflict { message: String, code: ErrorCode },

    /// Generative provider failed.
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Blob storage operation failed.
    #[error("Storage error: {message}")]
    Storage { message: String, code: ErrorCode },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (AUTH_xxx)
    AuthInvalidCredentials,
    AuthInvalidToken,
    AuthMissingCredentials,
    AuthInactiveUser,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValMissingField,
    ValUnsupportedMedia,

    // Documents and courses (DOC_xxx)
    DocNotFound,
    DocNoText,
    CourseNotFound,
    UserNotFound,
    DocDuplicate,

    // LLM (LLM_xxx)
    LlmGenerationFailed,
    LlmInvalidResponse,

    // Database (DB_xxx)
    DbOperationFailed,

    // Storage (STO_xxx)
    StoWriteFailed,
    StoReadFailed,

    // Network (NET_xxx)
    NetConnectionFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthInvalidCredentials => "AUTH_001",
            ErrorCode::AuthInvalidToken => "AUTH_002",
            ErrorCode::AuthMissingCredentials => "AUTH_003",
            ErrorCode::AuthInactiveUser => "AUTH_004",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValMissingField => "VAL_002",
            ErrorCode::ValUnsupportedMedia => "VAL_003",
            ErrorCode::DocNotFound => "DOC_001",
            ErrorCode::DocNoText => "DOC_002",
            ErrorCode::CourseNotFound => "DOC_003",
            ErrorCode::UserNotFound => "DOC_004",
            ErrorCode::DocDuplicate => "DOC_005",
            ErrorCode::LlmGenerationFailed => "LLM_002",
            ErrorCode::LlmInvalidResponse => "LLM_003",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::StoWriteFailed => "STO_001",
            ErrorCode::StoReadFailed => "STO_002",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl LearnSyncError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
        }
    }

    /// Create a validation error for a missing field.
    pub fn missing_field(field: &str) -> Self {
        let mut details = HashMap::new();
        details.insert("field".to_string(), field.to_string());
        Self::Validation {
            message: format!("Missing required field '{}'", field),
            code: ErrorCode::ValMissingField,
            details,
        }
    }

    /// Create an unsupported media error.
    pub fn unsupported_media(message: impl Into<String>) -> Self {
        Self::UnsupportedMedia {
            message: message.into(),
            code: ErrorCode::ValUnsupportedMedia,
        }
    }

    /// Document absent or not owned by the caller.
    pub fn document_not_found() -> Self {
        Self::NotFound {
            message: "Document not found".to_string(),
            code: ErrorCode::DocNotFound,
            resource: "document",
        }
    }

    /// Course absent or not owned by the caller.
    pub fn course_not_found() -> Self {
        Self::NotFound {
            message: "Course not found".to_string(),
            code: ErrorCode::CourseNotFound,
            resource: "course",
        }
    }

    /// User absent.
    pub fn user_not_found() -> Self {
        Self::NotFound {
            message: "User not found".to_string(),
            code: ErrorCode::UserNotFound,
            resource: "user",
        }
    }

    /// Document has no extracted text to derive from.
    pub fn no_text() -> Self {
        Self::Precondition {
            message: "Document has no text to analyze".to_string(),
            code: ErrorCode::DocNoText,
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            code: ErrorCode::DocDuplicate,
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: ErrorCode::AuthInvalidCredentials,
        }
    }

    /// Create an invalid-token error.
    pub fn invalid_token() -> Self {
        Self::Authentication {
            message: "Could not validate credentials".to_string(),
            code: ErrorCode::AuthInvalidToken,
        }
    }

    /// Create an LLM error.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmGenerationFailed,
            source: None,
        }
    }

    /// Create an LLM error for a malformed provider response.
    pub fn llm_invalid_response(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmInvalidResponse,
            source: None,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoWriteFailed,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Authentication { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::UnsupportedMedia { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Precondition { code, .. } => *code,
            Self::Conflict { code, .. } => *code,
            Self::Llm { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Authentication { .. } => Some("Log in again to obtain a fresh access token"),
            Self::UnsupportedMedia { .. } => {
                Some("Upload a PDF, an MP3/WAV/MP4 recording or a JPG/PNG image")
            }
            Self::Precondition { .. } => {
                Some("Upload a document with readable text before generating study material")
            }
            Self::Llm { .. } => Some("Please check your LLM provider configuration"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for LearnSyncError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}

impl From<ExtractError> for LearnSyncError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedType(_) => Self::unsupported_media(err.to_string()),
            ExtractError::Io(e) => Self::Io(e),
            other => Self::Internal(other.to_string()),
        }
    }
}
