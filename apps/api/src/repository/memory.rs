use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRecord, NewApplication};
use crate::repository::ApplicationRepository;

/// Process-local store. Keeps insertion order; loses everything on restart.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    records: RwLock<Vec<ApplicationRecord>>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn create(
        &self,
        application: NewApplication,
        resume: String,
    ) -> Result<ApplicationRecord, AppError> {
        let record = ApplicationRecord {
            id: Uuid::new_v4(),
            first_name: application.first_name,
            last_name: application.last_name,
            email: application.email,
            job_role: application.job_role,
            address: application.address,
            city: application.city,
            pincode: application.pincode,
            date: application.date,
            resume,
            created_at: Utc::now(),
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<ApplicationRecord>, AppError> {
        Ok(self.records.read().await.clone())
    }
}
