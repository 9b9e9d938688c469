//! Authentication routes: register, login, refresh, profile.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError, MessageBody};
use crate::middleware::auth::CurrentUser;
use crate::middleware::extract::AppJson;
use crate::models::user::{LoginRequest, RegisterUser, UserResponse};
use crate::services::auth::{self as auth_service, TokenPair};
use crate::services::user as user_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterUser>,
) -> Result<Json<ApiResponse<MessageBody>>, AppError> {
    tracing::info!(username = %body.username, "Registration attempt");
    auth_service::register(&state.db, &body).await?;
    Ok(ApiResponse::success(MessageBody::new(
        "User registered successfully",
    )))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens =
        auth_service::login(&state.db, &body.username, &body.password, &state.config.jwt).await?;
    Ok(ApiResponse::success(tokens))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(body): AppJson<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens =
        auth_service::refresh_token(&state.db, &body.refresh_token, &state.config.jwt).await?;
    Ok(ApiResponse::success(tokens))
}

/// GET /api/auth/me: current user profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = user_service::find_by_id(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}
