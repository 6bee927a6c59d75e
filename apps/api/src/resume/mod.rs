//! Resume text extraction for uploaded PDF files.

use tracing::{debug, warn};

use crate::interview::errors::InterviewError;

const PDF_MAGIC: &[u8] = b"%PDF-";
/// Larger uploads are rejected before extraction.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

/// Extracts plain text from an in-memory PDF.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, InterviewError> {
    if bytes.is_empty() {
        return Err(InterviewError::InvalidInput(
            "uploaded resume is empty".to_string(),
        ));
    }
    if bytes.len() > MAX_PDF_BYTES {
        return Err(InterviewError::InvalidInput(format!(
            "uploaded resume exceeds {MAX_PDF_BYTES} bytes"
        )));
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(InterviewError::InvalidInput(
            "uploaded resume is not a PDF".to_string(),
        ));
    }

    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        warn!("PDF text extraction failed: {e}");
        InterviewError::InvalidInput(format!("could not read PDF: {e}"))
    })?;

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(InterviewError::InvalidInput(
            "no text could be extracted from the PDF".to_string(),
        ));
    }
    debug!("Extracted {} characters from PDF resume", text.len());
    Ok(text)
}

/// Collapses runs of blank lines and trims trailing spaces left by extraction.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
