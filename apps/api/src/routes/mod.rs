pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::diagnostics;
use crate::state::AppState;

/// Upper bound on a multipart upload (resume + job description).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/analyze/report", post(handlers::handle_analyze_report))
        .route(
            "/api/v1/diagnostics/credential",
            get(diagnostics::handle_credential_status),
        )
        .route(
            "/api/v1/diagnostics/connection",
            get(diagnostics::handle_connection_test),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
