use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::error;

use crate::db::prepare_schema;
use crate::errors::AppError;
use crate::models::application::{ApplicationRecord, NewApplication};
use crate::repository::ApplicationRepository;

/// Records live in the `job_applications` table. `id` and `created_at` come
/// from column defaults.
///
/// The table is created on the first successful contact with the store, so a
/// store that was down at startup works as soon as it comes back.
#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
    schema: Arc<OnceCell<()>>,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: Arc::new(OnceCell::new()),
        }
    }

    /// Runs migrations once. A failure leaves the cell empty and the next
    /// call tries again.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        self.schema
            .get_or_try_init(|| async {
                prepare_schema(&self.pool).await.map_err(|e| {
                    error!("Store not ready: {e:#}");
                    AppError::Persistence(format!("{e:#}"))
                })
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn create(
        &self,
        application: NewApplication,
        resume: String,
    ) -> Result<ApplicationRecord, AppError> {
        self.ensure_schema().await?;
        let record = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            INSERT INTO job_applications
                (first_name, last_name, email, job_role, address, city, pincode, date, resume)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, first_name, last_name, email, job_role, address, city,
                      pincode, date, resume, created_at
            "#,
        )
        .bind(application.first_name)
        .bind(application.last_name)
        .bind(application.email)
        .bind(application.job_role)
        .bind(application.address)
        .bind(application.city)
        .bind(application.pincode)
        .bind(application.date)
        .bind(resume)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<ApplicationRecord>, AppError> {
        self.ensure_schema().await?;
        let records = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            SELECT id, first_name, last_name, email, job_role, address, city,
                   pincode, date, resume, created_at
            FROM job_applications
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
