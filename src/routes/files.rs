//! File listing route

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::sessions::FileRecord;
use crate::state::AppState;

/// Create the files router
pub fn router() -> Router<AppState> {
    Router::new().route("/:session_id", get(list_files))
}

/// GET /api/files/:session_id
///
/// Unknown sessions are not an error; they list as empty.
async fn list_files(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<Vec<FileRecord>> {
    let files = state.registry().list(&session_id).await;
    tracing::debug!(session_id = %session_id, count = files.len(), "Listed files");
    Json(files)
}
