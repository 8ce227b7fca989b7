use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{AppError, FailWith, Failure};
use crate::models::application::{ApplicationForm, ApplicationRecord};
use crate::state::AppState;
use crate::uploads::UploadedFile;

/// The only multipart field a resume file is accepted under.
pub const RESUME_FIELD: &str = "resume";

pub const SUBMIT_OK: &str = "Application submitted successfully!";
pub const SUBMIT_FAILED: &str = "Failed to submit application";
pub const LIST_FAILED: &str = "Failed to fetch applications";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    /// Present only when a resume was uploaded.
    #[serde(rename = "resumePath", skip_serializing_if = "Option::is_none")]
    pub resume_path: Option<String>,
}

/// POST /apply
///
/// The resume is written before the record is inserted. If the insert fails
/// the file stays on disk with nothing pointing at it.
pub async fn handle_submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), Failure> {
    let mut multipart = multipart.fail_with(SUBMIT_FAILED)?;
    let (form, file) = read_submission(&mut multipart)
        .await
        .fail_with(SUBMIT_FAILED)?;

    let resume = state.uploads.store(file).await.fail_with(SUBMIT_FAILED)?;

    let record = state
        .repository
        .create(form.coerce(), resume.clone())
        .await
        .map_err(|e| {
            if !resume.is_empty() {
                warn!("Resume {resume} was written but its application was not saved");
            }
            e
        })
        .fail_with(SUBMIT_FAILED)?;

    info!("Application {} submitted (resume: {:?})", record.id, record.resume);

    let resume_path = (!record.resume.is_empty()).then(|| format!("/uploads/{}", record.resume));
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: SUBMIT_OK.to_string(),
            resume_path,
        }),
    ))
}

/// GET /applications
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationRecord>>, Failure> {
    let records = state.repository.list_all().await.fail_with(LIST_FAILED)?;
    Ok(Json(records))
}

/// Splits a submission into its text fields and at most one resume file.
///
/// Unknown text fields are dropped. A file part with an empty file name is
/// treated as "no file chosen". A file under any field other than
/// [`RESUME_FIELD`], or a second resume, is an error.
pub async fn read_submission(
    multipart: &mut Multipart,
) -> Result<(ApplicationForm, Option<UploadedFile>), AppError> {
    let mut form = ApplicationForm::default();
    let mut resume: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) if file_name.is_empty() => {
                debug!("Skipping empty file part '{name}'");
            }
            Some(file_name) => {
                if name != RESUME_FIELD || resume.is_some() {
                    return Err(AppError::UnexpectedFileField(name));
                }
                let bytes = field.bytes().await?;
                resume = Some(UploadedFile { file_name, bytes });
            }
            None => {
                let value = field.text().await?;
                if !form.set(&name, value) {
                    debug!("Ignoring unknown form field '{name}'");
                }
            }
        }
    }

    Ok((form, resume))
}
