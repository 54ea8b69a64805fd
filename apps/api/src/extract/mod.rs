//! Resume text extraction — direct text layer first, OCR of rendered pages
//! when the text layer yields nothing.
//!
//! `TextExtractor::extract_text` never fails: stage failures are logged and
//! degrade to empty text. Callers treat `""` as "no extractable text".

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

pub mod ocr;
pub mod text_layer;

pub use ocr::TesseractOcr;
pub use text_layer::PdfTextLayer;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("PDF parser panicked while reading the document")]
    ParserPanicked,

    #[error("OCR tooling unavailable: {0}")]
    ToolMissing(String),

    #[error("{tool} failed: {stderr}")]
    Tool { tool: &'static str, stderr: String },
}

/// Reads the machine-readable text of each page, in page order.
pub trait TextLayer: Send + Sync {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// Renders each page to an image and recognizes its text, in page order.
/// A page that fails recognition comes back as an empty string.
pub trait OcrEngine: Send + Sync {
    fn recognize_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

pub struct TextExtractor {
    text_layer: Box<dyn TextLayer>,
    ocr: Box<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(text_layer: impl TextLayer + 'static, ocr: impl OcrEngine + 'static) -> Self {
        Self {
            text_layer: Box::new(text_layer),
            ocr: Box::new(ocr),
        }
    }

    /// Best-effort plain text of the PDF at `path`, trimmed. Empty if neither
    /// stage produced anything.
    pub fn extract_text(&self, path: &Path) -> String {
        let mut text = match self.text_layer.page_texts(path) {
            Ok(pages) => pages.concat(),
            Err(e) => {
                warn!("Direct text extraction failed for {}: {e}", path.display());
                String::new()
            }
        };

        if !text.trim().is_empty() {
            return text.trim().to_string();
        }

        info!("No text layer in {}, falling back to OCR", path.display());
        match self.ocr.recognize_pages(path) {
            Ok(pages) => {
                for page in pages {
                    text.push_str(&page);
                    text.push('\n');
                }
            }
            Err(e) => warn!("OCR failed for {}: {e}", path.display()),
        }

        text.trim().to_string()
    }
}
