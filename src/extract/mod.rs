//! Text extraction from uploaded files.

mod ocr;
mod pdf;

pub use ocr::{DEFAULT_OCR_LANG, ocr_image};
pub use pdf::extract_text;
