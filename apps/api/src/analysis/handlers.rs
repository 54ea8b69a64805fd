//! Axum route handlers for resume upload and analysis.

use std::path::Path;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::analysis::AnalysisError;
use crate::errors::AppError;
use crate::state::AppState;

pub const REPORT_FILENAME: &str = "resume_analysis.txt";

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// Parsed multipart form: the resume PDF and the optional job description.
#[derive(Debug, Default)]
struct AnalyzeForm {
    resume: Option<Bytes>,
    job_description: Option<String>,
}

/// POST /api/v1/analyze
///
/// Multipart fields: `resume` (PDF file), `job_description` (optional text).
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let analysis = run_analysis(&state, multipart).await?;
    Ok(Json(AnalyzeResponse { analysis }))
}

/// POST /api/v1/analyze/report
///
/// Same input as `/analyze`; returns the analysis as a downloadable text file.
pub async fn handle_analyze_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let analysis = run_analysis(&state, multipart).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        render_report(&analysis),
    ))
}

/// Text of the downloadable report: fixed banner, then the analysis.
pub fn render_report(analysis: &str) -> String {
    format!("Resume Analysis Results\n{}\n\n{analysis}", "=".repeat(50))
}

/// upload → persist → extract → analyze, under the pipeline lock.
async fn run_analysis(state: &AppState, multipart: Multipart) -> Result<String, AppError> {
    let form = read_form(multipart).await?;
    let resume = form.resume.ok_or(AppError::NoResumeUploaded)?;

    let _guard = state.pipeline_lock.lock().await;

    let path = state.config.upload_path.clone();
    persist_upload(&path, resume).await?;

    let extractor = state.extractor.clone();
    let resume_text = tokio::task::spawn_blocking(move || extractor.extract_text(&path))
        .await
        .context("Text extraction task failed")?;
    info!("Extracted {} chars of resume text", resume_text.len());

    state
        .analyzer
        .analyze_resume(&resume_text, form.job_description.as_deref())
        .await
        .map_err(|e| match e {
            AnalysisError::EmptyResume => AppError::NoExtractableText,
            other => AppError::Analysis(other),
        })
}

async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                if !is_pdf_upload(field.file_name(), field.content_type()) {
                    return Err(AppError::Validation(
                        "Resume must be a PDF file".to_string(),
                    ));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                if !data.is_empty() {
                    form.resume = Some(data);
                }
            }
            "job_description" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job description: {e}"))
                })?;
                form.job_description = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn is_pdf_upload(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    let by_name = file_name
        .map(|n| n.to_lowercase().ends_with(".pdf"))
        .unwrap_or(false);
    let by_type = content_type == Some("application/pdf");
    by_name || by_type
}

/// Overwrites the fixed upload location with the new resume.
async fn persist_upload(path: &Path, data: Bytes) -> Result<(), AppError> {
    tokio::fs::write(path, &data)
        .await
        .with_context(|| format!("Failed to write upload to {}", path.display()))?;
    Ok(())
}
