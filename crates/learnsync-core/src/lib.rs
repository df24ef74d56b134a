//! learnsync-core - Core library for learnsync.
//!
//! This crate provides the types, traits, storage and ingestion pipeline of
//! the learnsync study assistant: uploads are classified, extracted (locally
//! or through a generative provider), language-detected and persisted;
//! summaries, quizzes and flashcards are derived on demand.
//!
//! # Example
//!
//! ```ignore
//! use learnsync_core::{IngestionOrchestrator, Upload};
//!
//! let doc = orchestrator
//!     .upload(user_id, Upload {
//!         filename: "lecture.pdf".into(),
//!         content_type: Some("application/pdf".into()),
//!         bytes,
//!         course_id: None,
//!     })
//!     .await?;
//!
//! let analysis = orchestrator.analyze(user_id, doc.id).await?;
//! println!("{}", analysis.summary);
//! ```

pub mod auth;
pub mod blob;
pub mod cache;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod json_parser;
pub mod language;
pub mod remote;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use auth::Authenticator;
pub use blob::LocalBlobStore;
pub use cache::{InMemoryDerivationCache, SingleFlight};
pub use config::{AppConfig, LlmProvider, LlmProviderConfig};
pub use error::{ErrorCode, LearnSyncError, LearnSyncResult};
pub use ingestion::{ContentExtractor, IngestionOrchestrator, Upload};
pub use remote::{RemoteOutcome, RemoteTextService};
pub use store::SqliteStore;
pub use traits::{
    BlobStore, CachedAnalysis, DerivationCache, GenerationOptions, LlmConfig, ResponseFormat,
    TextProvider,
};
pub use types::{
    Course, Document, DocumentAnalysis, Flashcard, FlashcardDeck, KeyConcept, Language, MediaKind,
    Page, Question, QuestionDraft, Quiz, Token, User,
};
