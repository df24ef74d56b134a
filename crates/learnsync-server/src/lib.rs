//! learnsync-server - REST API server for learnsync.
//!
//! Serves registration and login, courses, document upload and the
//! on-demand study material endpoints over the learnsync core.
//!
//! # Example
//!
//! ```ignore
//! use learnsync_core::AppConfig;
//! use learnsync_server::{create_server, factory::create_state};
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = create_state(AppConfig::from_env()).unwrap();
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod factory;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use factory::{create_state, create_state_with};
pub use middleware::AuthUser;
pub use state::AppState;

use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
///
/// Stored uploads are served read-only under `/static`.
pub fn create_server(state: AppState) -> Router {
    let upload_limit = state.config.server.max_upload_bytes;
    let uploads = ServeDir::new(state.config.storage.upload_dir.clone());

    routes::create_router(state)
        .nest_service("/static", uploads)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
