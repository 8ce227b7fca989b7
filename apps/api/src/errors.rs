use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised inside the intake pipeline.
///
/// None of these reach the client in structured form: handlers turn them
/// into a [`Failure`] carrying a fixed, endpoint-specific message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to write resume '{name}': {source}")]
    StorageWrite {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unexpected file field: {0}")]
    UnexpectedFileField(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Not a multipart request: {0}")]
    NotMultipart(#[from] axum::extract::multipart::MultipartRejection),
}

/// Generic 500 response for a handler. The underlying cause is logged, never
/// surfaced.
#[derive(Debug)]
pub struct Failure {
    pub message: &'static str,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Maps a handler-internal error onto its endpoint's generic failure.
pub trait FailWith<T> {
    fn fail_with(self, message: &'static str) -> Result<T, Failure>;
}

impl<T, E> FailWith<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn fail_with(self, message: &'static str) -> Result<T, Failure> {
        self.map_err(|e| {
            let err: AppError = e.into();
            match &err {
                AppError::StorageWrite { .. } => tracing::error!("Storage error: {err}"),
                AppError::Persistence(_) | AppError::Database(_) => {
                    tracing::error!("Persistence error: {err}")
                }
                AppError::UnexpectedFileField(_)
                | AppError::Multipart(_)
                | AppError::NotMultipart(_) => {
                    tracing::error!("Request error: {err}")
                }
            }
            Failure { message }
        })
    }
}
