//! Upload route
//!
//! `POST /api/upload` takes a multipart form with a `sessionId` text field
//! and a `file` part. The file is streamed to the content directory as it
//! arrives, then recorded under the session once fully written.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::sessions::FileRecord;
use crate::storage::StoredBlob;
use crate::state::AppState;

const SESSION_FIELD: &str = "sessionId";
const FILE_FIELD: &str = "file";
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Create the upload router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_file))
        .layer(DefaultBodyLimit::disable())
}

/// File part already written to the content directory
struct UploadedFile {
    name: String,
    mime_type: String,
    blob: StoredBlob,
}

/// POST /api/upload
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileRecord>> {
    let mut session_id: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

    let parsed = read_form(&state, &mut multipart, &mut session_id, &mut file).await;

    let (session_id, file) = match (parsed, session_id.filter(|s| !s.is_empty()), file) {
        (Ok(()), Some(session_id), Some(file)) => (session_id, file),
        (parsed, _, file) => {
            // Nothing will refer to a blob from a rejected request.
            if let Some(file) = file {
                discard(&state, &file.blob).await;
            }
            parsed?;
            return Err(AppError::BadRequest("Missing session ID or file".to_string()));
        }
    };

    let record = FileRecord {
        id: Uuid::new_v4().to_string(),
        name: file.name,
        size: file.blob.size,
        mime_type: file.mime_type,
        url: state.blob_url(&file.blob.stored_name),
        created_at: state.clock().now_millis(),
        stored_name: file.blob.stored_name,
    };

    state.registry().append(&session_id, record.clone()).await;

    tracing::info!(
        session_id = %session_id,
        file_name = %record.name,
        size = record.size,
        "Uploaded file"
    );

    Ok(Json(record))
}

/// Walk the form, streaming the file part straight to the blob store.
///
/// Whatever was read before an error is left in `session_id` and `file` so
/// the caller can clean up.
async fn read_form(
    state: &AppState,
    multipart: &mut Multipart,
    session_id: &mut Option<String>,
    file: &mut Option<UploadedFile>,
) -> Result<()> {
    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Malformed upload: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            SESSION_FIELD => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read session ID: {}", e))
                })?;
                *session_id = Some(text);
            }
            FILE_FIELD => {
                // Browsers send an empty filename when no file was picked;
                // like a missing filename, that is not a file part.
                let Some(name) = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                else {
                    tracing::debug!("Ignoring '{}' field without a filename", FILE_FIELD);
                    continue;
                };

                if file.is_some() {
                    return Err(AppError::BadRequest(
                        "Only one file per upload is accepted".to_string(),
                    ));
                }

                let mime_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_MIME_TYPE)
                    .to_string();

                let mut writer = state
                    .blob_store()
                    .create(&name, state.clock().now_millis())
                    .await?;

                loop {
                    let chunk = match field.chunk().await {
                        Ok(Some(chunk)) => chunk,
                        Ok(None) => break,
                        Err(e) => {
                            tracing::warn!("Failed to read file data: {}", e);
                            writer.abort().await;
                            return Err(AppError::BadRequest(format!(
                                "Failed to read file data: {}",
                                e
                            )));
                        }
                    };

                    if let Err(e) = writer.write_chunk(&chunk).await {
                        writer.abort().await;
                        return Err(e.into());
                    }
                }

                let blob = writer.finish().await?;
                *file = Some(UploadedFile {
                    name,
                    mime_type,
                    blob,
                });
            }
            other => {
                tracing::debug!("Ignoring multipart field '{}'", other);
            }
        }
    }

    Ok(())
}

async fn discard(state: &AppState, blob: &StoredBlob) {
    if let Err(e) = state.blob_store().remove(&blob.stored_name).await {
        tracing::warn!(stored_name = %blob.stored_name, "Failed to remove rejected blob: {}", e);
    }
}
