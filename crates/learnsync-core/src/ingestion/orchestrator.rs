//! Ingestion orchestrator: the upload pipeline and on-demand derivations.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use learnsync_extractors::classify;

use crate::blob::storage_name;
use crate::cache::SingleFlight;
use crate::config::DerivationConfig;
use crate::error::{LearnSyncError, LearnSyncResult};
use crate::json_parser::parse_items;
use crate::language;
use crate::remote::prompts::{analysis_prompt, flashcards_prompt, quiz_prompt, truncate_chars};
use crate::remote::{RemoteOutcome, RemoteTextService};
use crate::store::SqliteStore;
use crate::traits::{BlobStore, CachedAnalysis, DerivationCache};
use crate::types::{
    questions_from_drafts, Document, DocumentAnalysis, Flashcard, FlashcardDeck, KeyConcept,
    NewDocument, Page, QuestionDraft, Quiz,
};

use super::ContentExtractor;

/// An incoming file.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Filename as the client sent it.
    pub filename: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    /// Course to file the document under.
    pub course_id: Option<i64>,
}

/// Shape the analysis prompt asks the model for.
#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    #[serde(default = "default_summary")]
    summary: String,
    #[serde(default)]
    concepts: Vec<Value>,
}

fn default_summary() -> String {
    "Summary failed".to_string()
}

type Shared<T> = Result<T, Arc<LearnSyncError>>;

/// Sequences extraction, language detection and persistence for uploads,
/// and cache, store and remote generation for derivations.
pub struct IngestionOrchestrator {
    store: SqliteStore,
    blobs: Arc<dyn BlobStore>,
    extractor: ContentExtractor,
    remote: RemoteTextService,
    cache: Arc<dyn DerivationCache>,
    settings: DerivationConfig,
    analysis_flights: SingleFlight<i64, Shared<DocumentAnalysis>>,
    quiz_flights: SingleFlight<i64, Shared<Quiz>>,
    flashcard_flights: SingleFlight<i64, Shared<FlashcardDeck>>,
}

impl IngestionOrchestrator {
    pub fn new(
        store: SqliteStore,
        blobs: Arc<dyn BlobStore>,
        extractor: ContentExtractor,
        remote: RemoteTextService,
        cache: Arc<dyn DerivationCache>,
        settings: DerivationConfig,
    ) -> Self {
        Self {
            store,
            blobs,
            extractor,
            remote,
            cache,
            settings,
            analysis_flights: SingleFlight::new(),
            quiz_flights: SingleFlight::new(),
            flashcard_flights: SingleFlight::new(),
        }
    }

    /// Ingest an uploaded file: classify, store, extract, detect language, persist.
    ///
    /// Classification and course ownership are checked before anything is
    /// written. The document row is inserted once, fully populated.
    #[instrument(skip(self, upload), fields(filename = %upload.filename))]
    pub async fn upload(&self, owner_id: i64, upload: Upload) -> LearnSyncResult<Document> {
        if upload.filename.trim().is_empty() {
            return Err(LearnSyncError::validation("Uploaded file has no filename"));
        }

        let media_kind = classify(upload.content_type.as_deref(), &upload.filename)?;

        if let Some(course_id) = upload.course_id {
            self.store
                .get_course(course_id, owner_id)?
                .ok_or_else(LearnSyncError::course_not_found)?;
        }

        let stored_name = storage_name(&upload.filename);
        let path = self.blobs.save(&stored_name, &upload.bytes).await?;

        let extracted_text = self.extractor.extract(&path, media_kind).await;
        let language = language::detect(extracted_text.as_deref());

        let inserted = self.store.insert_document(&NewDocument {
            filename: upload.filename,
            stored_name,
            file_path: path.to_string_lossy().into_owned(),
            media_kind,
            extracted_text,
            language,
            owner_id,
            course_id: upload.course_id,
        });
        let doc = match inserted {
            Ok(doc) => doc,
            Err(e) => {
                if let Err(cleanup) = self.blobs.remove(&path).await {
                    warn!(
                        path = %path.display(),
                        error = %cleanup,
                        "Could not remove orphaned upload"
                    );
                }
                return Err(e);
            }
        };

        info!(
            document_id = doc.id,
            media_kind = %media_kind,
            language = %language,
            has_text = doc.text().is_some(),
            "Document ingested"
        );
        Ok(doc)
    }

    /// List a user's documents.
    pub fn list_documents(&self, owner_id: i64, page: Page) -> LearnSyncResult<Vec<Document>> {
        self.store.list_documents(owner_id, page)
    }

    /// Get one of a user's documents.
    pub fn get_document(&self, owner_id: i64, document_id: i64) -> LearnSyncResult<Document> {
        self.store
            .get_document(document_id, owner_id)?
            .ok_or_else(LearnSyncError::document_not_found)
    }

    /// Quizzes generated for one of a user's documents, newest first.
    pub fn list_quizzes(&self, owner_id: i64, document_id: i64) -> LearnSyncResult<Vec<Quiz>> {
        let doc = self.get_document(owner_id, document_id)?;
        self.store.list_quizzes(doc.id)
    }

    /// Flashcard decks generated for one of a user's documents, newest first.
    pub fn list_flashcard_decks(
        &self,
        owner_id: i64,
        document_id: i64,
    ) -> LearnSyncResult<Vec<FlashcardDeck>> {
        let doc = self.get_document(owner_id, document_id)?;
        self.store.list_flashcard_decks(doc.id)
    }

    /// Summarize a document and extract its key concepts.
    ///
    /// A cached result for the caller is returned without touching the store
    /// or the provider. Provider failures still succeed, with a placeholder
    /// analysis that is persisted but not cached.
    #[instrument(skip(self))]
    pub async fn analyze(&self, owner_id: i64, document_id: i64) -> LearnSyncResult<DocumentAnalysis> {
        if let Some(hit) = self.cached_analysis(owner_id, document_id).await {
            debug!(document_id, "Analysis cache hit");
            return Ok(hit);
        }

        let doc = self.derivable_document(owner_id, document_id)?;

        self.analysis_flights
            .run(document_id, move || async move {
                self.compute_analysis(doc).await.map_err(Arc::new)
            })
            .await
            .map_err(unshare)
    }

    /// Generate and append a multiple-choice quiz for a document.
    #[instrument(skip(self))]
    pub async fn generate_quiz(&self, owner_id: i64, document_id: i64) -> LearnSyncResult<Quiz> {
        let doc = self.derivable_document(owner_id, document_id)?;

        self.quiz_flights
            .run(document_id, move || async move {
                self.compute_quiz(doc).await.map_err(Arc::new)
            })
            .await
            .map_err(unshare)
    }

    /// Generate and append a flashcard deck for a document.
    #[instrument(skip(self))]
    pub async fn generate_flashcards(
        &self,
        owner_id: i64,
        document_id: i64,
    ) -> LearnSyncResult<FlashcardDeck> {
        let doc = self.derivable_document(owner_id, document_id)?;

        self.flashcard_flights
            .run(document_id, move || async move {
                self.compute_flashcards(doc).await.map_err(Arc::new)
            })
            .await
            .map_err(unshare)
    }

    async fn cached_analysis(&self, owner_id: i64, document_id: i64) -> Option<DocumentAnalysis> {
        self.cache
            .get(document_id)
            .await
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.analysis)
    }

    /// Load a caller's document and require it to have text.
    fn derivable_document(&self, owner_id: i64, document_id: i64) -> LearnSyncResult<Document> {
        let doc = self.get_document(owner_id, document_id)?;
        if doc.text().is_none() {
            return Err(LearnSyncError::no_text());
        }
        Ok(doc)
    }

    fn prompt_text<'a>(&self, doc: &'a Document) -> &'a str {
        truncate_chars(doc.text().unwrap_or_default(), self.settings.text_budget_chars)
    }

    async fn compute_analysis(&self, doc: Document) -> LearnSyncResult<DocumentAnalysis> {
        // A flight that finished just before this one started may have filled the cache.
        if let Some(hit) = self.cached_analysis(doc.owner_id, doc.id).await {
            return Ok(hit);
        }

        let prompt = analysis_prompt(self.prompt_text(&doc), doc.language);
        let (summary, key_concepts, degraded) =
            match self.remote.generate_structured::<AnalysisPayload>(&prompt).await {
                RemoteOutcome::Ok(payload) => {
                    (payload.summary, parse_items(payload.concepts), false)
                }
                RemoteOutcome::Degraded(reason) => (
                    format!("Error generating summary: {}", reason),
                    vec![KeyConcept::new("Error", "Failed to extract concepts")],
                    true,
                ),
            };

        self.cache.invalidate(doc.id).await;
        self.store.set_analysis(doc.id, &summary, &key_concepts)?;

        let analysis = DocumentAnalysis {
            id: doc.id,
            summary,
            key_concepts,
        };

        if !degraded {
            self.cache
                .set(
                    doc.id,
                    CachedAnalysis {
                        owner_id: doc.owner_id,
                        analysis: analysis.clone(),
                    },
                )
                .await;
        }

        info!(document_id = doc.id, degraded, "Document analyzed");
        Ok(analysis)
    }

    async fn compute_quiz(&self, doc: Document) -> LearnSyncResult<Quiz> {
        let prompt = quiz_prompt(
            self.prompt_text(&doc),
            doc.language,
            self.settings.quiz_questions,
        );
        let items = self
            .remote
            .generate_structured::<Vec<Value>>(&prompt)
            .await
            .unwrap_or(Vec::new());
        let questions = questions_from_drafts(parse_items::<QuestionDraft>(items));

        let quiz = self
            .store
            .insert_quiz(doc.id, &format!("Quiz for {}", doc.filename), &questions)?;

        info!(document_id = doc.id, quiz_id = quiz.id, questions = questions.len(), "Quiz generated");
        Ok(quiz)
    }

    async fn compute_flashcards(&self, doc: Document) -> LearnSyncResult<FlashcardDeck> {
        let prompt = flashcards_prompt(
            self.prompt_text(&doc),
            doc.language,
            self.settings.flashcards,
        );
        let items = self
            .remote
            .generate_structured::<Vec<Value>>(&prompt)
            .await
            .unwrap_or(Vec::new());
        let cards: Vec<Flashcard> = parse_items(items);

        let deck = self.store.insert_flashcard_deck(
            doc.id,
            &format!("Flashcards for {}", doc.filename),
            &cards,
        )?;

        info!(document_id = doc.id, deck_id = deck.id, cards = cards.len(), "Flashcards generated");
        Ok(deck)
    }
}

/// Recover an owned error from one shared between single-flight waiters.
fn unshare(err: Arc<LearnSyncError>) -> LearnSyncError {
    match Arc::try_unwrap(err) {
        Ok(err) => err,
        Err(shared) => match shared.as_ref() {
            LearnSyncError::NotFound { .. } => LearnSyncError::document_not_found(),
            other => LearnSyncError::Internal(other.to_string()),
        },
    }
}
