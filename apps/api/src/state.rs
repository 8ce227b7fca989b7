use std::sync::Arc;

use crate::repository::ApplicationRepository;
use crate::uploads::UploadStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup: Postgres in production, in-memory for tests and local runs.
    pub repository: Arc<dyn ApplicationRepository>,
    pub uploads: UploadStore,
}
