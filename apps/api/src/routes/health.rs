use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// 200 while the upload directory is usable, 503 otherwise. The record store
/// is not checked here; its outages surface as 500s on the data endpoints.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let uploads_ok = state.uploads.is_available().await;
    let (status, summary, uploads) = if uploads_ok {
        (StatusCode::OK, "ok", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "missing")
    };

    (
        status,
        Json(json!({
            "status": summary,
            "uploads": uploads,
            "version": env!("CARGO_PKG_VERSION"),
            "service": "intake-api"
        })),
    )
}
