//! Multipart file upload with background-removal preprocessing.

use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::services::background_removal::{is_supported_image_type, jpeg_filename};
use crate::services::uploads::StoredFile;
use crate::state::AppState;

/// Response for an upload batch.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub files: Vec<StoredFile>,
}

/// `POST /admin/uploads` - store uploaded files.
///
/// Images (jpeg/png/webp) go through background removal and come back as
/// flattened JPEGs with a `.jpg` filename; when removal fails for any
/// reason the original bytes are stored unprocessed instead. Non-image
/// files pass through unchanged. Files are processed one at a time, each
/// awaited to completion, with no size limit at this layer.
///
/// # Errors
///
/// Returns 400 when the request contains no files.
pub async fn upload(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let filename = field.file_name().unwrap_or("file").to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

        let (stored_name, stored_bytes) = if is_supported_image_type(&content_type) {
            tracing::info!(file = %filename, "processing background removal");

            match state
                .background_removal()
                .remove_background(&bytes, &content_type)
                .await
            {
                Ok(processed) => {
                    tracing::info!(file = %filename, "background removed");
                    (jpeg_filename(&filename), processed.bytes)
                }
                Err(e) => {
                    // Fall back to the original file if background removal fails
                    tracing::error!(file = %filename, error = %e, "background removal failed");
                    (filename.clone(), bytes.to_vec())
                }
            }
        } else {
            (filename.clone(), bytes.to_vec())
        };

        let stored = state
            .files()
            .store(&stored_name, &stored_bytes)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        files.push(stored);
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No files were uploaded".to_owned()));
    }

    Ok(Json(UploadResponse { files }))
}
