//! Image uploads written to local disk under random file names.

use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;

/// URL prefix under which the upload directory is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Accepted image types, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    /// Classify by the extension of the client-supplied file name.
    pub fn from_filename(name: &str) -> Result<(Self, String), AppError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let kind = match ext.as_str() {
            "jpg" | "jpeg" => ImageKind::Jpeg,
            "png" => ImageKind::Png,
            "gif" => ImageKind::Gif,
            _ => {
                return Err(AppError::Validation(
                    "Invalid file type. Only JPG, PNG, and GIF files are allowed.".to_string(),
                ))
            }
        };
        Ok((kind, ext))
    }
}

/// Where an uploaded file ended up.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub file_name: String,
    /// Public path, e.g. `/uploads/<uuid>.png`.
    pub path: String,
}

/// Persist an image under `dir` as `<uuid><ext>`, creating `dir` if needed.
pub async fn save_image(
    dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<StoredFile, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("No file uploaded".to_string()));
    }
    let (kind, ext) = ImageKind::from_filename(original_name)?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {e}")))?;

    let file_name = format!("{}.{ext}", Uuid::new_v4());
    let full_path = dir.join(&file_name);

    tokio::fs::write(&full_path, bytes)
        .await
        .map_err(|e| AppError::Internal(format!("File upload failed: {e}")))?;

    tracing::info!(file = %file_name, kind = ?kind, size = bytes.len(), "Image stored");

    Ok(StoredFile {
        path: format!("{UPLOADS_URL_PREFIX}/{file_name}"),
        file_name,
    })
}

/// Delete a stored image by file name. A file that is already gone is ignored.
pub async fn remove_image(dir: &Path, file_name: &str) {
    match tokio::fs::remove_file(dir.join(file_name)).await {
        Ok(()) => tracing::info!(file = %file_name, "Image removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(error = %e, file = %file_name, "Failed to remove image"),
    }
}
