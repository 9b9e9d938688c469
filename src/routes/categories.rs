//! Category routes: public reads, admin writes.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::extract::{AppJson, AppPath};
use crate::middleware::rbac::RequireAdmin;
use crate::models::category::{Category, CategoryInput};
use crate::services::category as category_service;
use crate::AppState;

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, AppError> {
    let categories = category_service::list_all(&state.db).await?;
    Ok(ApiResponse::success(categories))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let category = category_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(category))
}

/// POST /api/categories (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppJson(body): AppJson<CategoryInput>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), AppError> {
    let category = category_service::create(&state.db, &body).await?;
    Ok(ApiResponse::created(category))
}

/// PUT /api/categories/:id (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<i32>,
    AppJson(body): AppJson<CategoryInput>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let category = category_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/categories/:id (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    category_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
