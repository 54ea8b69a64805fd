use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::failure::FailureCategory;
use crate::analysis::AnalysisError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No resume uploaded")]
    NoResumeUploaded,

    /// Extraction (text layer and OCR) produced nothing for the uploaded file.
    #[error("No extractable text found in the uploaded resume")]
    NoExtractableText,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut category: Option<FailureCategory> = None;

        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NoResumeUploaded => (
                StatusCode::BAD_REQUEST,
                "NO_RESUME_UPLOADED",
                "Please upload a resume in PDF format".to_string(),
            ),
            AppError::NoExtractableText => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_EXTRACTABLE_TEXT",
                "No extractable text was found in the uploaded PDF, even with OCR".to_string(),
            ),
            AppError::Analysis(AnalysisError::EmptyResume) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                AnalysisError::EmptyResume.to_string(),
            ),
            AppError::Analysis(e @ AnalysisError::NoModel) => {
                tracing::error!("Model selection failed: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONFIGURATION_ERROR",
                    e.to_string(),
                )
            }
            AppError::Analysis(AnalysisError::Upstream {
                category: c,
                model,
                diagnostic,
            }) => {
                tracing::error!("Analysis with {model} failed: {}", c.code());
                category = Some(*c);
                let status = match c {
                    FailureCategory::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, c.code(), diagnostic.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "category": category,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
