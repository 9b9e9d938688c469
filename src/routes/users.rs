//! User routes: self-service profile and admin maintenance.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError, MessageBody};
use crate::middleware::auth::CurrentUser;
use crate::middleware::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::{ChangePassword, UpdateUser, UpdateUserProfile, UserResponse};
use crate::services::user as user_service;
use crate::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilters {
    pub search: Option<String>,
}

/// GET /api/users: list users (admin).
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(pagination): AppQuery<Pagination>,
    AppQuery(filters): AppQuery<UserFilters>,
) -> Result<Json<ApiResponse<PagedResult<UserResponse>>>, AppError> {
    let result = user_service::list(&state.db, filters.search.as_deref(), &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = user_service::find_by_id(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// PUT /api/users/me: update own profile.
pub async fn update_me(
    State(state): State<AppState>,
    current_user: CurrentUser,
    AppJson(body): AppJson<UpdateUserProfile>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = user_service::update_profile(&state.db, current_user.id, &body).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// PUT /api/users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    AppJson(body): AppJson<ChangePassword>,
) -> Result<Json<ApiResponse<MessageBody>>, AppError> {
    user_service::change_password(&state.db, current_user.id, &body).await?;
    Ok(ApiResponse::success(MessageBody::new(
        "Password changed successfully",
    )))
}

/// GET /api/users/:id (admin)
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = user_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// PUT /api/users/:id (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<i32>,
    AppJson(body): AppJson<UpdateUser>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = user_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// DELETE /api/users/:id (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    if admin.id == id {
        return Err(AppError::Validation(
            "Admins cannot delete their own account".to_string(),
        ));
    }
    user_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
