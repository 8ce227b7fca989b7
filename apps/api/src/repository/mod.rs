//! Application Repository: persists and lists application records.
//!
//! `AppState` holds an `Arc<dyn ApplicationRepository>` constructed once at
//! startup, so handlers never reach for a global model.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::application::{ApplicationRecord, NewApplication};

pub use memory::InMemoryApplicationRepository;
pub use postgres::PgApplicationRepository;

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persists a new record with the given resume reference (`""` for none)
    /// and returns it with its assigned `id` and `created_at`. No retry.
    async fn create(
        &self,
        application: NewApplication,
        resume: String,
    ) -> Result<ApplicationRecord, AppError>;

    /// Every record ever created, in whatever order the store yields them.
    async fn list_all(&self) -> Result<Vec<ApplicationRecord>, AppError>;
}
