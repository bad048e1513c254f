use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Multipart, MultipartError},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::domain::{RawSubmission, SubmissionOutcome, UploadedFile};
use super::repository::{CandidateRepository, ContentStore};
use super::service::IntakeService;

/// Router builder exposing the multipart submission endpoint.
pub fn intake_router<R, S>(service: Arc<IntakeService<R, S>>) -> Router
where
    R: CandidateRepository + 'static,
    S: ContentStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/enrollment/applications",
            post(submit_handler::<R, S>),
        )
        .with_state(service)
}

/// Success body returned by the submission endpoint, in the camelCase wire
/// form callers consume.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    pub protocol: String,
    pub applicant_id: Option<String>,
    pub documents_count: usize,
    pub titles_count: usize,
}

impl From<SubmissionOutcome> for SubmissionResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            success: true,
            message: "application received".to_string(),
            protocol: outcome.protocol,
            applicant_id: outcome.applicant_id.map(|id| id.0),
            documents_count: outcome.documents_count,
            titles_count: outcome.titles_count,
        }
    }
}

pub(crate) async fn submit_handler<R, S>(
    State(service): State<Arc<IntakeService<R, S>>>,
    multipart: Multipart,
) -> Response
where
    R: CandidateRepository + 'static,
    S: ContentStore + 'static,
{
    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(err) => {
            let payload = json!({
                "success": false,
                "error": format!("malformed multipart payload: {err}"),
            });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.submit(submission) {
        Ok(outcome) => {
            (StatusCode::OK, Json(SubmissionResponse::from(outcome))).into_response()
        }
        Err(err) if err.is_client_error() => {
            let payload = json!({
                "success": false,
                "error": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "submission failed during commit");
            let payload = json!({
                "success": false,
                "error": "internal server error",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// Split the multipart payload into named text fields and named file parts.
/// Parts with a filename are files; everything else is treated as text.
async fn read_submission(mut multipart: Multipart) -> Result<RawSubmission, MultipartError> {
    let mut submission = RawSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(filename) = field.file_name().map(str::to_string) {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;
            submission.files.push(UploadedFile {
                slot: name,
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field.text().await?;
            submission.fields.insert(name, value);
        }
    }

    Ok(submission)
}
