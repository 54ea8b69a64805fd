mod analysis;
mod config;
mod diagnostics;
mod errors;
mod extract;
mod gemini;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::model_selector::default_preferred_models;
use crate::analysis::Analyzer;
use crate::config::{has_expected_key_format, Config, API_KEY_PREFIX};
use crate::extract::{PdfTextLayer, TesseractOcr, TextExtractor};
use crate::gemini::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing GOOGLE_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    if !has_expected_key_format(&config.google_api_key) {
        warn!("GOOGLE_API_KEY does not start with '{API_KEY_PREFIX}'; verify the key is correct");
    }

    // Initialize Gemini client; the credential is checked by the first real call
    let gemini = GeminiClient::new(config.google_api_key.clone(), &config.gemini_api_base)
        .context("Failed to build Gemini HTTP client")?;
    info!("Gemini client initialized ({})", config.gemini_api_base);

    let analyzer = Analyzer::new(Arc::new(gemini), default_preferred_models());

    // Text layer first, OCR fallback for scanned resumes
    if !TesseractOcr::is_available() {
        warn!("pdftoppm/tesseract not found; image-only PDFs will yield no text");
    }
    let extractor = TextExtractor::new(
        PdfTextLayer,
        TesseractOcr::new(config.ocr_dpi, config.ocr_lang.clone()),
    );
    info!(
        "Uploads stored at {} (OCR {} dpi, lang {})",
        config.upload_path.display(),
        config.ocr_dpi,
        config.ocr_lang
    );

    let state = AppState::new(analyzer, extractor, config.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
