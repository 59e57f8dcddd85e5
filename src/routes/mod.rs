//! Route modules for LAN Drop Server

pub mod files;
pub mod status;
pub mod upload;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
///
/// - `POST /api/upload`, `GET /api/files/:session_id` and `GET /api/status`
/// - `/uploads/*` served straight from the content directory
/// - anything else falls through to the static frontend
pub fn app(state: AppState) -> Router {
    let upload_dir = state.blob_store().base_path().to_path_buf();
    let static_dir = state.config().storage.static_dir.clone();

    // Any device on the LAN may call in, including pages served elsewhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/upload", upload::router())
        .nest("/api/files", files::router())
        .nest("/api/status", status::router())
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
