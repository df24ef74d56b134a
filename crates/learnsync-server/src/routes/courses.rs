//! Course endpoints, scoped to the caller.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use learnsync_core::error::LearnSyncError;
use learnsync_core::types::{Course, Document};

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
}

/// POST /courses/
pub async fn create_course(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateCourseRequest>,
) -> ApiResult<Json<Course>> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::from(LearnSyncError::missing_field("title")));
    }
    Ok(Json(state.store.create_course(user.id(), title)?))
}

/// GET /courses/
pub async fn list_courses(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Course>>> {
    Ok(Json(state.store.list_courses(user.id())?))
}

/// GET /courses/:id
pub async fn get_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<i64>,
) -> ApiResult<Json<Course>> {
    let course = state
        .store
        .get_course(course_id, user.id())?
        .ok_or_else(LearnSyncError::course_not_found)?;
    Ok(Json(course))
}

/// GET /courses/:id/documents
pub async fn list_course_documents(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<i64>,
) -> ApiResult<Json<Vec<Document>>> {
    state
        .store
        .get_course(course_id, user.id())?
        .ok_or_else(LearnSyncError::course_not_found)?;
    Ok(Json(state.store.list_course_documents(course_id, user.id())?))
}
