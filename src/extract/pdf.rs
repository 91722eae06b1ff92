//! PDF text extraction.

use std::path::Path;

use tracing::info;

use crate::error::ExtractionError;

/// Extract the text content of a PDF file.
///
/// Fails with [`ExtractionError`] on unreadable or corrupt input; an empty
/// result for a valid but text-free PDF is not an error.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String, ExtractionError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ExtractionError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let text = pdf_extract::extract_text(path)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    info!(
        path = %path.display(),
        chars = text.len(),
        "extracted PDF text"
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_text("/nonexistent/file.pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::IoError(_)));
    }

    #[test]
    fn test_corrupt_pdf_is_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();
        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::PdfError(_)));
    }
}
