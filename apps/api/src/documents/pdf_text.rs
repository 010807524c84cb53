use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Extracts the text layer of an uploaded PDF.
///
/// Parsing is CPU-bound, so it runs on the blocking pool. Unreadable files and
/// files with no text layer (scanned images) are caller errors.
pub async fn extract_resume_text(data: Bytes) -> Result<String, AppError> {
    let size = data.len();
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| {
            // pdf-extract panics on some malformed inputs instead of returning an error.
            if e.is_panic() {
                AppError::Validation("Could not read PDF".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
            }
        })?
        .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?;

    if extracted.trim().is_empty() {
        return Err(AppError::Validation("No readable text found in PDF".to_string()));
    }

    debug!("Extracted {} chars from {size}-byte PDF", extracted.len());
    Ok(extracted)
}
