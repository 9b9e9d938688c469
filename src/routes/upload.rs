//! Standalone image upload endpoint.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::services::upload as upload_service;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub path: String,
}

/// POST /api/upload/image: multipart field `photo` (any authenticated user).
pub async fn image(
    State(state): State<AppState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
        upload = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let stored = upload_service::save_image(&state.config.upload_dir, &filename, &data).await?;
    tracing::info!(user_id = current_user.id, file = %stored.file_name, "Upload accepted");

    Ok(ApiResponse::success(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file_name: stored.file_name,
        path: stored.path,
    }))
}
