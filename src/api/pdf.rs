//! PDF upload endpoints
//!
//! Uploaded files are transient: written under the upload directory,
//! processed on a blocking thread, and removed again on every exit path
//! before the response is returned.

use axum::{
    extract::{Multipart, State},
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{ApiError, SharedState};
use crate::documents::{DocumentChunk, PdfProcessor};
use crate::error::FarecastError;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/extract-text", post(extract_text))
}

/// Upload a PDF and return its content in chunks
async fn upload(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<Vec<DocumentChunk>>, ApiError> {
    let path = receive_pdf(&state, multipart).await?;
    let chunks = with_cleanup(&path, state.documents, |processor, path| {
        processor.process(path)
    })
    .await?;
    Ok(Json(chunks))
}

/// Extract raw text from an uploaded PDF
async fn extract_text(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let path = receive_pdf(&state, multipart).await?;
    let text = with_cleanup(&path, state.documents, |processor, path| {
        processor.extract_text(path)
    })
    .await?;
    Ok(Json(json!({ "text": text })))
}

/// Validate the multipart file field and persist it under the upload dir
async fn receive_pdf(state: &SharedState, mut multipart: Multipart) -> Result<PathBuf, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FarecastError::validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(String::from) else {
            continue;
        };

        validate_pdf_filename(&file_name)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| FarecastError::validation(format!("Failed to read upload: {e}")))?;

        if data.len() > state.max_upload_size {
            return Err(FarecastError::validation("File too large").into());
        }

        tokio::fs::create_dir_all(&state.upload_dir)
            .await
            .map_err(|e| FarecastError::general(format!("Error saving file: {e}")))?;

        // Keep only the bare file name so an uploaded name cannot escape
        // the upload directory
        let bare_name = Path::new(&file_name)
            .file_name()
            .ok_or_else(|| FarecastError::validation("Invalid file name"))?;
        let path = state.upload_dir.join(bare_name);

        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| FarecastError::general(format!("Error saving file: {e}")))?;

        return Ok(path);
    }

    Err(FarecastError::validation("A PDF file is required").into())
}

/// Run a blocking processing step and unconditionally delete the transient
/// file afterwards, whether processing succeeded or failed
async fn with_cleanup<T, F>(path: &Path, processor: PdfProcessor, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(PdfProcessor, &Path) -> crate::Result<T> + Send + 'static,
{
    let task_path = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || work(processor, &task_path)).await;

    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove transient upload {}: {e}", path.display());
    }

    let value = result
        .map_err(|e| FarecastError::general(format!("PDF processing task failed: {e}")))??;
    Ok(value)
}

fn validate_pdf_filename(file_name: &str) -> Result<(), FarecastError> {
    if file_name.to_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        Err(FarecastError::validation("Only PDF files are allowed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("report.pdf", true)]
    #[case("REPORT.PDF", true)]
    #[case("report.txt", false)]
    #[case("report.pdf.txt", false)]
    #[case("report", false)]
    fn test_pdf_filename_validation(#[case] name: &str, #[case] ok: bool) {
        assert_eq!(validate_pdf_filename(name).is_ok(), ok);
    }
}
