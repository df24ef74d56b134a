//! Route definitions for the REST API.

mod auth;
mod courses;
mod documents;
mod health;
mod study;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/token", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Courses
        .route("/courses/", post(courses::create_course).get(courses::list_courses))
        .route("/courses/:id", get(courses::get_course))
        .route("/courses/:id/documents", get(courses::list_course_documents))
        // Documents
        .route("/documents/upload", post(documents::upload_document))
        .route("/documents/", get(documents::list_documents))
        .route("/documents/:id", get(documents::get_document))
        .route("/documents/:id/quizzes", get(documents::list_quizzes))
        // Derivations
        .route("/documents/:id/analyze", post(study::analyze_document))
        .route("/documents/:id/quiz", post(study::generate_quiz))
        .route(
            "/documents/:id/flashcards",
            post(study::generate_flashcards).get(documents::list_flashcard_decks),
        )
        // Attach state
        .with_state(state)
}

pub use auth::*;
pub use courses::*;
pub use documents::*;
pub use health::*;
pub use study::*;
