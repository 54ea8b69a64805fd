use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google API keys are issued with this prefix.
pub const API_KEY_PREFIX: &str = "AIza";

/// Application configuration loaded from environment variables.
/// Fails at startup if the API credential is missing. Its format is only
/// checked superficially; the remote service validates it on first use.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_api_base: String,
    /// Fixed location the uploaded resume is written to (overwritten per upload).
    pub upload_path: PathBuf,
    pub ocr_dpi: u32,
    pub ocr_lang: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let google_api_key = read_api_key().context(
            "Required environment variable 'GOOGLE_API_KEY' is not set. \
             Add GOOGLE_API_KEY=your_key (no quotes, no spaces) to a .env file in the \
             project root, or export it, then restart. \
             Keys are issued at https://makersuite.google.com/app/apikey",
        )?;

        Ok(Config {
            google_api_key,
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
            upload_path: std::env::var("UPLOAD_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploaded_resume.pdf")),
            ocr_dpi: std::env::var("OCR_DPI")
                .unwrap_or_else(|_| "300".to_string())
                .parse::<u32>()
                .context("OCR_DPI must be a positive integer")?,
            ocr_lang: std::env::var("OCR_LANG").unwrap_or_else(|_| "eng".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads `GOOGLE_API_KEY`, normalized. `None` when unset or blank.
pub fn read_api_key() -> Option<String> {
    std::env::var("GOOGLE_API_KEY")
        .ok()
        .map(|raw| normalize_api_key(&raw))
        .filter(|key| !key.is_empty())
}

/// Strips surrounding whitespace and one layer of quoting, as `.env` files
/// frequently carry `KEY="value"`.
pub fn normalize_api_key(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_string()
}

pub fn has_expected_key_format(key: &str) -> bool {
    key.starts_with(API_KEY_PREFIX)
}
