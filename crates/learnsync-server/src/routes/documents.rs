//! Document upload and listing endpoints.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use tracing::debug;

use learnsync_core::error::LearnSyncError;
use learnsync_core::types::{Document, FlashcardDeck, Page, Quiz};
use learnsync_core::Upload;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Upload a file, optionally into a course.
/// POST /documents/upload
///
/// Multipart fields: `file` (required) and `course_id` (optional).
pub async fn upload_document(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<Document>> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut course_id = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                file = Some((filename, content_type, bytes.to_vec()));
            }
            Some("course_id") => {
                let raw = field.text().await?;
                course_id = parse_course_id(&raw)?;
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let (filename, content_type, bytes) =
        file.ok_or_else(|| ApiError::from(LearnSyncError::missing_field("file")))?;

    let doc = state
        .orchestrator
        .upload(
            user.id(),
            Upload {
                filename,
                content_type,
                bytes,
                course_id,
            },
        )
        .await?;
    Ok(Json(doc))
}

fn parse_course_id(raw: &str) -> ApiResult<Option<i64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ApiError::from(LearnSyncError::validation("course_id must be an integer")))
}

/// List the caller's documents.
/// GET /documents/?skip=&limit=
pub async fn list_documents(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.orchestrator.list_documents(user.id(), page)?))
}

/// GET /documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<i64>,
) -> ApiResult<Json<Document>> {
    Ok(Json(state.orchestrator.get_document(user.id(), document_id)?))
}

/// Quiz history, newest first.
/// GET /documents/:id/quizzes
pub async fn list_quizzes(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<i64>,
) -> ApiResult<Json<Vec<Quiz>>> {
    Ok(Json(state.orchestrator.list_quizzes(user.id(), document_id)?))
}

/// Flashcard deck history, newest first.
/// GET /documents/:id/flashcards
pub async fn list_flashcard_decks(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<i64>,
) -> ApiResult<Json<Vec<FlashcardDeck>>> {
    Ok(Json(
        state
            .orchestrator
            .list_flashcard_decks(user.id(), document_id)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_course_id() {
        assert_eq!(parse_course_id("").unwrap(), None);
        assert_eq!(parse_course_id(" 7 ").unwrap(), Some(7));
        assert!(parse_course_id("seven").is_err());
    }
}
