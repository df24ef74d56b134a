//! On-demand derivation endpoints.
//!
//! Provider failures do not fail these requests: the payload comes back
//! degraded (placeholder summary, empty quiz or deck) with a 200.

use axum::{
    extract::{Path, State},
    Json,
};

use learnsync_core::types::{DocumentAnalysis, FlashcardDeck, Quiz};

use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// POST /documents/:id/analyze
pub async fn analyze_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<i64>,
) -> ApiResult<Json<DocumentAnalysis>> {
    Ok(Json(state.orchestrator.analyze(user.id(), document_id).await?))
}

/// POST /documents/:id/quiz
pub async fn generate_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<i64>,
) -> ApiResult<Json<Quiz>> {
    Ok(Json(
        state
            .orchestrator
            .generate_quiz(user.id(), document_id)
            .await?,
    ))
}

/// POST /documents/:id/flashcards
pub async fn generate_flashcards(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<i64>,
) -> ApiResult<Json<FlashcardDeck>> {
    Ok(Json(
        state
            .orchestrator
            .generate_flashcards(user.id(), document_id)
            .await?,
    ))
}
