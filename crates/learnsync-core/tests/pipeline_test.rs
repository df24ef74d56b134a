//! End-to-end tests for the ingestion pipeline.
//!
//! Drives the orchestrator against an in-memory SQLite store, a temp-dir
//! blob store, a scripted text provider and a scripted local PDF parser.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use learnsync_core::config::DerivationConfig;
use learnsync_core::{
    ContentExtractor, DerivationCache, GenerationOptions, InMemoryDerivationCache,
    IngestionOrchestrator, KeyConcept, Language, LearnSyncError, LearnSyncResult, LocalBlobStore,
    MediaKind, RemoteTextService, SqliteStore, TextProvider, Upload,
};
use learnsync_extractors::{ExtractError, ExtractResult, ExtractedContent, Extractor};

/// Scripted provider that counts every call.
#[derive(Default)]
struct ScriptedProvider {
    generate_reply: Mutex<Option<String>>,
    bytes_reply: Mutex<Option<String>>,
    file_reply: Mutex<Option<String>>,
    delay: Option<Duration>,
    generate_calls: AtomicUsize,
    bytes_calls: AtomicUsize,
    file_calls: AtomicUsize,
    file_mime_types: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn generating(self, reply: &str) -> Self {
        *self.generate_reply.lock().unwrap() = Some(reply.to_string());
        self
    }

    fn ocr(self, reply: &str) -> Self {
        *self.bytes_reply.lock().unwrap() = Some(reply.to_string());
        self
    }

    fn files(self, reply: &str) -> Self {
        *self.file_reply.lock().unwrap() = Some(reply.to_string());
        self
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn set_generate_reply(&self, reply: Option<&str>) {
        *self.generate_reply.lock().unwrap() = reply.map(str::to_string);
    }

    fn answer(slot: &Mutex<Option<String>>) -> LearnSyncResult<String> {
        slot.lock()
            .unwrap()
            .clone()
            .ok_or_else(|| LearnSyncError::llm("provider unavailable"))
    }

    fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    fn file_calls(&self) -> usize {
        self.file_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for ScriptedProvider {
    async fn generate(
        &self,
        prompt: &str,
        _options: Option<GenerationOptions>,
    ) -> LearnSyncResult<String> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Self::answer(&self.generate_reply)
    }

    async fn generate_from_bytes(
        &self,
        _prompt: &str,
        _data: &[u8],
        _mime_type: &str,
    ) -> LearnSyncResult<String> {
        self.bytes_calls.fetch_add(1, Ordering::SeqCst);
        Self::answer(&self.bytes_reply)
    }

    async fn generate_from_file(
        &self,
        _prompt: &str,
        _path: &Path,
        mime_type: &str,
    ) -> LearnSyncResult<String> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        self.file_mime_types
            .lock()
            .unwrap()
            .push(mime_type.to_string());
        Self::answer(&self.file_reply)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Local PDF parser returning a fixed text, or failing.
struct ScriptedPdf {
    text: Option<String>,
}

#[async_trait]
impl Extractor for ScriptedPdf {
    async fn extract(&self, _content: &[u8]) -> ExtractResult<ExtractedContent> {
        match &self.text {
            Some(text) => {
                Ok(ExtractedContent::new(text.clone(), MediaKind::Pdf).with_page_count(1))
            }
            None => Err(ExtractError::ExtractionFailed("corrupt xref".to_string())),
        }
    }

    fn supported_kinds(&self) -> &[MediaKind] {
        &[MediaKind::Pdf]
    }

    fn name(&self) -> &str {
        "scripted-pdf"
    }
}

struct Harness {
    orchestrator: Arc<IngestionOrchestrator>,
    store: SqliteStore,
    provider: Arc<ScriptedProvider>,
    cache: Arc<InMemoryDerivationCache>,
    upload_dir: tempfile::TempDir,
    user_id: i64,
}

fn harness(provider: ScriptedProvider, local_pdf_text: Option<&str>) -> Harness {
    let store = SqliteStore::in_memory().unwrap();
    let user_id = store
        .create_user(&learnsync_core::types::NewUser {
            email: "student@example.com".to_string(),
            full_name: "Student".to_string(),
            password_hash: "unused".to_string(),
            preferred_language: Language::En,
        })
        .unwrap()
        .id;

    let upload_dir = tempfile::tempdir().unwrap();
    let blobs = Arc::new(LocalBlobStore::new(upload_dir.path().join("uploads")));
    let provider = Arc::new(provider);
    let remote = RemoteTextService::new(provider.clone());
    let local_pdf = Arc::new(ScriptedPdf {
        text: local_pdf_text.map(str::to_string),
    });
    let extractor = ContentExtractor::new(local_pdf, remote.clone(), blobs.clone());
    let cache = Arc::new(InMemoryDerivationCache::new());

    let orchestrator = IngestionOrchestrator::new(
        store.clone(),
        blobs,
        extractor,
        remote,
        cache.clone(),
        DerivationConfig::default(),
    );

    Harness {
        orchestrator: Arc::new(orchestrator),
        store,
        provider,
        cache,
        upload_dir,
        user_id,
    }
}

fn upload(filename: &str, content_type: Option<&str>) -> Upload {
    Upload {
        filename: filename.to_string(),
        content_type: content_type.map(str::to_string),
        bytes: b"\xFF\xD8\xFF\xE0 some bytes".to_vec(),
        course_id: None,
    }
}

fn other_user(store: &SqliteStore) -> i64 {
    store
        .create_user(&learnsync_core::types::NewUser {
            email: "other@example.com".to_string(),
            full_name: "Other".to_string(),
            password_hash: "unused".to_string(),
            preferred_language: Language::En,
        })
        .unwrap()
        .id
}

const ANALYSIS_JSON: &str = "```json\n{\"summary\": \"Cells are the unit of life.\", \"concepts\": [{\"term\": \"Cell\", \"definition\": \"Basic unit\"}]}\n```";

fn long_text() -> String {
    "The mitochondria is the powerhouse of the cell. ".repeat(10)
}

/// Scenario A: a text-rich PDF never reaches the provider.
#[tokio::test]
async fn test_pdf_fast_path_skips_remote() {
    let text = long_text();
    let h = harness(ScriptedProvider::default(), Some(&text));

    let doc = h
        .orchestrator
        .upload(h.user_id, upload("biology.pdf", Some("application/pdf")))
        .await
        .unwrap();

    assert_eq!(doc.media_kind, MediaKind::Pdf);
    assert_eq!(doc.extracted_text.as_deref(), Some(text.trim()));
    assert_eq!(doc.language, Language::En);
    assert_eq!(h.provider.file_calls(), 0);
    assert!(doc.stored_name.ends_with("_biology.pdf"));
    assert!(Path::new(&doc.file_path).exists());
}

/// Scenario B: a scanned PDF goes remote once and uses the remote text.
#[tokio::test]
async fn test_scanned_pdf_uses_remote_text() {
    let h = harness(
        ScriptedProvider::default().files("  نص مستخرج من المسح الضوئي  "),
        Some("Page 1"),
    );

    let doc = h
        .orchestrator
        .upload(h.user_id, upload("scan.pdf", Some("application/pdf")))
        .await
        .unwrap();

    assert_eq!(h.provider.file_calls(), 1);
    assert_eq!(
        doc.extracted_text.as_deref(),
        Some("نص مستخرج من المسح الضوئي")
    );
    assert_eq!(doc.language, Language::Ar);
    assert_eq!(
        h.provider.file_mime_types.lock().unwrap().as_slice(),
        ["application/pdf".to_string()]
    );
}

/// Scenario B, degraded: the local text is kept when the provider fails.
#[tokio::test]
async fn test_scanned_pdf_keeps_local_text_when_remote_degrades() {
    let h = harness(ScriptedProvider::default(), Some("  Page 1  "));

    let doc = h
        .orchestrator
        .upload(h.user_id, upload("scan.pdf", None))
        .await
        .unwrap();

    assert_eq!(h.provider.file_calls(), 1);
    assert_eq!(doc.extracted_text.as_deref(), Some("Page 1"));
}

#[tokio::test]
async fn test_unparseable_pdf_with_failed_remote_has_no_text() {
    let h = harness(ScriptedProvider::default(), None);

    let doc = h
        .orchestrator
        .upload(h.user_id, upload("broken.pdf", Some("application/pdf")))
        .await
        .unwrap();

    assert_eq!(h.provider.file_calls(), 1);
    assert!(doc.extracted_text.is_none());
    assert_eq!(doc.language, Language::En);
}

#[tokio::test]
async fn test_image_goes_to_ocr() {
    let h = harness(ScriptedProvider::default().ocr("ملاحظات مكتوبة بخط اليد"), None);

    let doc = h
        .orchestrator
        .upload(h.user_id, upload("board.jpg", Some("image/jpeg")))
        .await
        .unwrap();

    assert_eq!(doc.media_kind, MediaKind::Image);
    assert_eq!(doc.language, Language::Ar);
    assert_eq!(h.provider.bytes_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.provider.file_calls(), 0);
}

#[tokio::test]
async fn test_degraded_image_extraction_is_explained() {
    let h = harness(ScriptedProvider::default(), None);

    let doc = h
        .orchestrator
        .upload(h.user_id, upload("board.png", None))
        .await
        .unwrap();

    let text = doc.extracted_text.unwrap();
    assert!(text.starts_with("Extraction failed: "));
    assert!(text.contains("provider unavailable"));
}

#[tokio::test]
async fn test_media_kind_follows_extension() {
    let h = harness(ScriptedProvider::default().files("transcript"), None);

    let video = h
        .orchestrator
        .upload(h.user_id, upload("lecture.mp4", Some("video/mp4")))
        .await
        .unwrap();
    let audio = h
        .orchestrator
        .upload(h.user_id, upload("podcast.mp3", Some("audio/mpeg")))
        .await
        .unwrap();

    assert_eq!(video.media_kind, MediaKind::Video);
    assert_eq!(audio.media_kind, MediaKind::Audio);
    assert_eq!(
        h.provider.file_mime_types.lock().unwrap().as_slice(),
        ["video/mp4".to_string(), "audio/mpeg".to_string()]
    );
    assert_eq!(audio.extracted_text.as_deref(), Some("transcript"));
}

/// Scenario E: unsupported uploads are rejected before anything is written.
#[tokio::test]
async fn test_unsupported_upload_writes_nothing() {
    let h = harness(ScriptedProvider::default(), Some("unused"));

    let err = h
        .orchestrator
        .upload(h.user_id, upload("notes.txt", Some("text/plain")))
        .await
        .unwrap_err();

    assert!(matches!(err, LearnSyncError::UnsupportedMedia { .. }));
    assert!(!h.upload_dir.path().join("uploads").exists());
    assert!(h
        .store
        .list_documents(h.user_id, Default::default())
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_failed_insert_removes_stored_file() {
    let h = harness(ScriptedProvider::default().ocr("text"), Some("unused"));

    let err = h
        .orchestrator
        .upload(9999, upload("board.jpg", Some("image/jpeg")))
        .await
        .unwrap_err();

    assert!(matches!(err, LearnSyncError::Database { .. }));
    let uploads = h.upload_dir.path().join("uploads");
    assert_eq!(std::fs::read_dir(uploads).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_into_foreign_course_is_not_found() {
    let h = harness(ScriptedProvider::default(), Some("unused"));
    let stranger = other_user(&h.store);
    let course = h.store.create_course(stranger, "Not yours").unwrap();

    let mut request = upload("a.pdf", Some("application/pdf"));
    request.course_id = Some(course.id);
    let err = h.orchestrator.upload(h.user_id, request).await.unwrap_err();

    assert!(matches!(err, LearnSyncError::NotFound { .. }));
    assert!(!h.upload_dir.path().join("uploads").exists());
}

#[tokio::test]
async fn test_upload_into_own_course() {
    let text = long_text();
    let h = harness(ScriptedProvider::default(), Some(&text));
    let course = h.store.create_course(h.user_id, "Biology").unwrap();

    let mut request = upload("a.pdf", Some("application/pdf"));
    request.course_id = Some(course.id);
    let doc = h.orchestrator.upload(h.user_id, request).await.unwrap();

    assert_eq!(doc.course_id, Some(course.id));
    let listed = h.store.list_course_documents(course.id, h.user_id).unwrap();
    assert_eq!(listed.len(), 1);
}

/// Scenario C: no text means no derivation and no mutation.
#[tokio::test]
async fn test_analyze_without_text_is_rejected() {
    let h = harness(ScriptedProvider::default().generating(ANALYSIS_JSON), None);
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("blank.pdf", Some("application/pdf")))
        .await
        .unwrap();

    let err = h.orchestrator.analyze(h.user_id, doc.id).await.unwrap_err();
    assert!(matches!(err, LearnSyncError::Precondition { .. }));
    assert!(h.orchestrator.generate_quiz(h.user_id, doc.id).await.is_err());
    assert!(h
        .orchestrator
        .generate_flashcards(h.user_id, doc.id)
        .await
        .is_err());

    assert_eq!(h.provider.generate_calls(), 0);
    let unchanged = h.orchestrator.get_document(h.user_id, doc.id).unwrap();
    assert!(unchanged.summary.is_none());
}

/// Scenario D and idempotence: the second analysis is served from the cache.
#[tokio::test]
async fn test_second_analysis_is_cache_hit() {
    let text = long_text();
    let h = harness(ScriptedProvider::default().generating(ANALYSIS_JSON), Some(&text));
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();

    let first = h.orchestrator.analyze(h.user_id, doc.id).await.unwrap();
    assert_eq!(first.summary, "Cells are the unit of life.");
    assert_eq!(first.key_concepts, vec![KeyConcept::new("Cell", "Basic unit")]);

    let stored = h.orchestrator.get_document(h.user_id, doc.id).unwrap();
    assert_eq!(stored.summary.as_deref(), Some("Cells are the unit of life."));

    // Changing the row behind the orchestrator's back shows the hit skips the store.
    h.store.set_analysis(doc.id, "changed", &[]).unwrap();

    let second = h.orchestrator.analyze(h.user_id, doc.id).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(h.provider.generate_calls(), 1);
}

#[tokio::test]
async fn test_cache_hit_is_not_served_to_other_users() {
    let text = long_text();
    let h = harness(ScriptedProvider::default().generating(ANALYSIS_JSON), Some(&text));
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();
    h.orchestrator.analyze(h.user_id, doc.id).await.unwrap();

    let stranger = other_user(&h.store);
    let err = h.orchestrator.analyze(stranger, doc.id).await.unwrap_err();
    assert!(matches!(err, LearnSyncError::NotFound { .. }));
}

#[tokio::test]
async fn test_degraded_analysis_is_persisted_but_not_cached() {
    let text = long_text();
    let h = harness(ScriptedProvider::default(), Some(&text));
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();

    let degraded = h.orchestrator.analyze(h.user_id, doc.id).await.unwrap();
    assert!(degraded.summary.starts_with("Error generating summary: "));
    assert_eq!(
        degraded.key_concepts,
        vec![KeyConcept::new("Error", "Failed to extract concepts")]
    );
    assert!(h.cache.get(doc.id).await.is_none());

    h.provider.set_generate_reply(Some(ANALYSIS_JSON));
    let recovered = h.orchestrator.analyze(h.user_id, doc.id).await.unwrap();
    assert_eq!(recovered.summary, "Cells are the unit of life.");
    assert_eq!(h.provider.generate_calls(), 2);
}

#[tokio::test]
async fn test_concurrent_analyses_share_one_remote_call() {
    let text = long_text();
    let h = harness(
        ScriptedProvider::default()
            .generating(ANALYSIS_JSON)
            .slow(Duration::from_millis(100)),
        Some(&text),
    );
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();

    let calls = (0..5).map(|_| h.orchestrator.analyze(h.user_id, doc.id));
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(h.provider.generate_calls(), 1);
}

#[tokio::test]
async fn test_derivation_prompt_is_truncated() {
    let text = format!("{}{}", "a".repeat(8000), "§".repeat(500));
    let h = harness(ScriptedProvider::default().generating("[]"), Some(&text));
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("long.pdf", None))
        .await
        .unwrap();

    h.orchestrator
        .generate_flashcards(h.user_id, doc.id)
        .await
        .unwrap();

    let prompts = h.provider.prompts.lock().unwrap();
    assert!(prompts[0].contains(&"a".repeat(8000)));
    assert!(!prompts[0].contains('§'));
}

/// Round-trip: stored quizzes only hold answerable questions.
#[tokio::test]
async fn test_quiz_is_sanitized_and_appended() {
    let quiz_json = r#"```json
[
  {"id": 7, "question": "What is ATP?", "options": ["Energy", "Sugar", "Salt", "Water"], "correct_answer_index": 0},
  {"id": 8, "question": "Broken", "options": ["A", "B"], "correct_answer_index": 5},
  {"id": 9, "question": "Where is DNA?", "options": ["Nucleus", "Wall", "Membrane", "Vacuole"], "correct_answer_index": 0}
]
```"#;
    let text = long_text();
    let h = harness(ScriptedProvider::default().generating(quiz_json), Some(&text));
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();

    let quiz = h.orchestrator.generate_quiz(h.user_id, doc.id).await.unwrap();
    assert_eq!(quiz.title, "Quiz for bio.pdf");
    assert_eq!(quiz.questions.len(), 2);
    assert_eq!(quiz.questions[1].id, 2);

    h.orchestrator.generate_quiz(h.user_id, doc.id).await.unwrap();
    let history = h.orchestrator.list_quizzes(h.user_id, doc.id).unwrap();
    assert_eq!(history.len(), 2);
    for stored in &history {
        assert!(stored
            .questions
            .iter()
            .all(|q| q.correct_answer_index < q.options.len()));
    }
}

#[tokio::test]
async fn test_malformed_questions_are_dropped_individually() {
    let quiz_json = r#"[
  {"question": "What is ATP?", "options": ["Energy", "Sugar"], "correct_answer_index": 0},
  {"question": "Negative", "options": ["A", "B"], "correct_answer_index": -1},
  {"question": "Stringly", "options": ["A", "B"], "correct_answer_index": "1"},
  {"question": "No options", "correct_answer_index": 0},
  {"question": "No answer", "options": ["A", "B"]},
  {"question": "Where is DNA?", "options": ["Wall", "Nucleus"], "correct_answer_index": 1}
]"#;
    let text = long_text();
    let h = harness(ScriptedProvider::default().generating(quiz_json), Some(&text));
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();

    let quiz = h.orchestrator.generate_quiz(h.user_id, doc.id).await.unwrap();
    let kept: Vec<_> = quiz.questions.iter().map(|q| q.question.as_str()).collect();
    assert_eq!(kept, vec!["What is ATP?", "Where is DNA?"]);
    assert_eq!(quiz.questions[0].id, 1);
    assert_eq!(quiz.questions[1].id, 2);
}

#[tokio::test]
async fn test_malformed_cards_and_concepts_are_dropped_individually() {
    let cards_json = r#"[
  {"term": "Cell", "definition": "Unit of life"},
  {"term": "Orphan"},
  42,
  {"term": "Atom", "definition": "Smallest unit"}
]"#;
    let text = long_text();
    let h = harness(ScriptedProvider::default().generating(cards_json), Some(&text));
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();

    let deck = h
        .orchestrator
        .generate_flashcards(h.user_id, doc.id)
        .await
        .unwrap();
    let terms: Vec<_> = deck.cards.iter().map(|c| c.term.as_str()).collect();
    assert_eq!(terms, vec!["Cell", "Atom"]);

    h.provider.set_generate_reply(Some(
        r#"{"summary": "Cells.", "concepts": [{"term": "Cell", "definition": "Unit"}, {"definition": "no term"}]}"#,
    ));
    let analysis = h.orchestrator.analyze(h.user_id, doc.id).await.unwrap();
    assert_eq!(analysis.summary, "Cells.");
    assert_eq!(analysis.key_concepts, vec![KeyConcept::new("Cell", "Unit")]);
}

#[tokio::test]
async fn test_concurrent_quizzes_share_one_remote_call() {
    let quiz_json = r#"[{"question": "Q?", "options": ["A", "B"], "correct_answer_index": 1}]"#;
    let text = long_text();
    let h = harness(
        ScriptedProvider::default()
            .generating(quiz_json)
            .slow(Duration::from_millis(100)),
        Some(&text),
    );
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();

    let calls = (0..5).map(|_| h.orchestrator.generate_quiz(h.user_id, doc.id));
    let results = futures::future::join_all(calls).await;

    let ids: Vec<i64> = results.into_iter().map(|r| r.unwrap().id).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(h.provider.generate_calls(), 1);
    assert_eq!(h.orchestrator.list_quizzes(h.user_id, doc.id).unwrap().len(), 1);
}

#[tokio::test]
async fn test_degraded_flashcards_are_an_empty_deck() {
    let text = long_text();
    let h = harness(ScriptedProvider::default().generating("not json"), Some(&text));
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();

    let deck = h
        .orchestrator
        .generate_flashcards(h.user_id, doc.id)
        .await
        .unwrap();
    assert_eq!(deck.title, "Flashcards for bio.pdf");
    assert!(deck.cards.is_empty());
    assert_eq!(
        h.orchestrator
            .list_flashcard_decks(h.user_id, doc.id)
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_derivations_on_foreign_document_are_not_found() {
    let text = long_text();
    let h = harness(ScriptedProvider::default().generating("[]"), Some(&text));
    let doc = h
        .orchestrator
        .upload(h.user_id, upload("bio.pdf", None))
        .await
        .unwrap();
    let stranger = other_user(&h.store);

    assert!(matches!(
        h.orchestrator.generate_quiz(stranger, doc.id).await,
        Err(LearnSyncError::NotFound { .. })
    ));
    assert!(matches!(
        h.orchestrator.list_flashcard_decks(stranger, doc.id),
        Err(LearnSyncError::NotFound { .. })
    ));
    assert_eq!(h.provider.generate_calls(), 0);
}
