//! Mapping of pipeline failures to HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use survey_core::{FieldIssue, SubmissionError};
use survey_storage::StorageError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    #[error("Validation failed with {} issue(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::InvalidBody(detail) => Self::InvalidBody(detail),
            SubmissionError::Validation(issues) => Self::Validation(issues),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidBody(detail) => {
                warn!("Rejected survey body: {}", detail);
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "invalid_json", "detail": detail }),
                )
            }
            Self::Validation(issues) => {
                warn!(issues = issues.len(), "Rejected invalid survey submission");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({ "error": "validation_error", "detail": issues }),
                )
            }
            Self::Storage(e) => {
                // I/O details stay in the server log
                error!("Failed to persist survey submission: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "storage_error", "detail": "failed to persist submission" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
