//! OCR text extraction via the Tesseract CLI.

use std::path::Path;

use tokio::process::Command;
use tracing::{error, info, warn};

/// Default OCR language code.
pub const DEFAULT_OCR_LANG: &str = "eng";

/// Extract text from an image with Tesseract.
///
/// Shells out to the `tesseract` binary with the given language. Any
/// failure (missing binary, unreadable image, no text detected) is logged
/// and yields an empty string rather than an error; upload handling treats
/// an empty OCR result as "nothing to index".
pub async fn ocr_image(path: impl AsRef<Path>, lang: &str) -> String {
    let path = path.as_ref();
    info!(path = %path.display(), lang, "running OCR");

    // "stdout" as the output name makes tesseract print instead of writing
    // a file
    let output = match Command::new("tesseract")
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(lang)
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to invoke tesseract");
            return String::new();
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(
            path = %path.display(),
            status = ?output.status.code(),
            stderr = %stderr.trim(),
            "tesseract exited with failure"
        );
        return String::new();
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        warn!(path = %path.display(), "OCR detected no text");
    } else {
        info!(path = %path.display(), chars = text.len(), "OCR completed");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_image_yields_empty_string() {
        let text = ocr_image("/nonexistent/image.png", DEFAULT_OCR_LANG).await;
        assert!(text.is_empty());
    }
}
