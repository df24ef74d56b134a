//! Registration, login and current-user endpoints.

use axum::{extract::State, Form, Json};
use serde::Deserialize;

use learnsync_core::types::{Language, Token, User};

use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Request body for registering a user.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub password: String,
    pub preferred_language: Option<Language>,
}

/// OAuth2-style password form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// The user's email.
    pub username: String,
    pub password: String,
}

/// Register a user.
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<User>> {
    let user = state
        .auth
        .register(
            &request.email,
            &request.full_name,
            &request.password,
            request.preferred_language,
        )
        .await?;
    Ok(Json(user))
}

/// Exchange credentials for a bearer token.
/// POST /auth/token
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<Token>> {
    let token = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(token))
}

/// The authenticated user.
/// GET /auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
