//! Credential and connectivity diagnostics for whoever is operating the service.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::analysis::failure::{classify_failure, remediation, FailureCategory};
use crate::config::has_expected_key_format;
use crate::state::AppState;

/// How many model names the connection check reports.
const MODELS_SHOWN: usize = 10;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CredentialStatus {
    pub present: bool,
    /// Masked preview, never the full key.
    pub preview: Option<String>,
    pub format_ok: bool,
}

impl CredentialStatus {
    pub fn inspect(api_key: &str) -> Self {
        if api_key.is_empty() {
            return Self {
                present: false,
                preview: None,
                format_ok: false,
            };
        }
        Self {
            present: true,
            preview: Some(mask_key(api_key)),
            format_ok: has_expected_key_format(api_key),
        }
    }
}

/// `AIza...wxyz` for long keys, `***` otherwise.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectionReport {
    pub ok: bool,
    pub model_count: usize,
    /// First few model names, `models/` prefix removed.
    pub models: Vec<String>,
    pub category: Option<FailureCategory>,
    pub message: Option<String>,
}

/// GET /api/v1/diagnostics/credential
pub async fn handle_credential_status(State(state): State<AppState>) -> Json<CredentialStatus> {
    Json(CredentialStatus::inspect(&state.config.google_api_key))
}

/// GET /api/v1/diagnostics/connection
///
/// Exercises the credential with a model listing call.
pub async fn handle_connection_test(State(state): State<AppState>) -> Json<ConnectionReport> {
    let report = match state.analyzer.api().list_models().await {
        Ok(records) if records.is_empty() => ConnectionReport {
            ok: true,
            model_count: 0,
            models: Vec::new(),
            category: None,
            message: Some("Authentication succeeded but no models were listed".to_string()),
        },
        Ok(records) => ConnectionReport {
            ok: true,
            model_count: records.len(),
            models: records
                .iter()
                .take(MODELS_SHOWN)
                .filter(|r| !r.name.is_empty())
                .map(|r| r.short_name().to_string())
                .collect(),
            category: None,
            message: None,
        },
        Err(e) => {
            let message = e.to_string();
            let category = classify_failure(&message);
            ConnectionReport {
                ok: false,
                model_count: 0,
                models: Vec::new(),
                category: Some(category),
                message: Some(remediation(category, &message)),
            }
        }
    };

    info!(
        "Connection test: ok={}, models={}",
        report.ok, report.model_count
    );
    Json(report)
}
