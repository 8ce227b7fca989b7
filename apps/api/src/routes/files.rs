use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::errors::Failure;
use crate::state::AppState;

/// GET /uploads/:filename
///
/// Serves any file in the upload directory to anyone who knows its name.
/// There is no ownership check.
pub async fn handle_get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    match state.uploads.read(&filename).await {
        Ok(Some(bytes)) => {
            let content_type = mime_guess::from_path(&filename).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type.to_string())],
                bytes,
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "File not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to read upload {filename}: {e}");
            Failure {
                message: "Failed to read file",
            }
            .into_response()
        }
    }
}
