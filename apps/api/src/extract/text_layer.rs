use std::panic;
use std::path::Path;

use tracing::debug;

use super::{ExtractError, TextLayer};

/// Text-layer reader backed by `pdf-extract`.
///
/// `pdf-extract` panics on some malformed documents, so the parse runs under
/// `catch_unwind` and a panic is reported as a stage failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextLayer;

impl TextLayer for PdfTextLayer {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let bytes = std::fs::read(path)?;

        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
            .map_err(|_| ExtractError::ParserPanicked)?
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;

        debug!(
            "Text layer of {}: {} pages, {} chars",
            path.display(),
            pages.len(),
            pages.iter().map(String::len).sum::<usize>()
        );
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PdfTextLayer.page_texts(Path::new("/nonexistent/resume.pdf"));
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }

    #[test]
    fn test_non_pdf_bytes_fail_without_panicking() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not a pdf").unwrap();
        let result = PdfTextLayer.page_texts(file.path());
        assert!(matches!(
            result,
            Err(ExtractError::Pdf(_)) | Err(ExtractError::ParserPanicked)
        ));
    }
}
