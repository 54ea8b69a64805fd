//! OCR for image-only PDFs: `pdftoppm` (poppler-utils) renders each page to a
//! PNG in a scratch directory, `tesseract` reads each image.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use super::{ExtractError, OcrEngine};

#[derive(Debug, Clone)]
pub struct TesseractOcr {
    /// Render resolution. Higher reads small print better but is slower.
    pub dpi: u32,
    /// Tesseract language code, e.g. `eng`.
    pub lang: String,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            dpi: 300,
            lang: "eng".to_string(),
        }
    }
}

impl TesseractOcr {
    pub fn new(dpi: u32, lang: impl Into<String>) -> Self {
        Self {
            dpi,
            lang: lang.into(),
        }
    }

    /// True if both `pdftoppm` and `tesseract` can be spawned.
    pub fn is_available() -> bool {
        let pdftoppm = Command::new("pdftoppm").arg("-v").output().is_ok();
        let tesseract = Command::new("tesseract").arg("--version").output().is_ok();

        if !pdftoppm {
            debug!("pdftoppm not found - install poppler-utils for OCR support");
        }
        if !tesseract {
            debug!("tesseract not found - install tesseract-ocr for OCR support");
        }
        pdftoppm && tesseract
    }

    fn render_pages(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf)
            .arg(out_dir.join("page"))
            .output()?;

        if !output.status.success() {
            return Err(ExtractError::Tool {
                tool: "pdftoppm",
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // pdftoppm zero-pads page numbers, so lexical order is page order.
        let mut images: Vec<PathBuf> = std::fs::read_dir(out_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        images.sort();
        Ok(images)
    }

    fn recognize_image(&self, image: &Path) -> Result<String, ExtractError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()?;

        if !output.status.success() {
            return Err(ExtractError::Tool {
                tool: "tesseract",
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        if !Self::is_available() {
            return Err(ExtractError::ToolMissing(
                "OCR requires pdftoppm (poppler-utils) and tesseract-ocr".to_string(),
            ));
        }

        let scratch = tempfile::tempdir()?;
        let images = self.render_pages(path, scratch.path())?;
        info!(
            "Rendered {} pages of {} at {} dpi, running OCR",
            images.len(),
            path.display(),
            self.dpi
        );

        Ok(recognize_each(&images, |image| self.recognize_image(image)))
    }
}

/// Runs `recognize` once per page image, in order. A failed page becomes empty
/// text so the remaining pages still contribute.
fn recognize_each<F>(images: &[PathBuf], mut recognize: F) -> Vec<String>
where
    F: FnMut(&Path) -> Result<String, ExtractError>,
{
    images
        .iter()
        .enumerate()
        .map(|(i, image)| match recognize(image) {
            Ok(text) => text,
            Err(e) => {
                warn!("OCR failed on page {}: {e}", i + 1);
                String::new()
            }
        })
        .collect()
}
