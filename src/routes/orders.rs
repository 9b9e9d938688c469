//! Order routes.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::extract::{AppJson, AppPath};
use crate::middleware::rbac::RequireAdmin;
use crate::models::order::{CreateOrder, Order, OrderWithDetails, UpdateOrder};
use crate::models::user::UserRole;
use crate::services::order as order_service;
use crate::AppState;

/// GET /api/orders (admin)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<OrderWithDetails>>>, AppError> {
    let orders = order_service::list_all(&state.db).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/:id: admins see any order, others only orders placed under their username.
pub async fn get_by_id(
    State(state): State<AppState>,
    current_user: CurrentUser,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ApiResponse<OrderWithDetails>>, AppError> {
    let order = order_service::find_by_id(&state.db, id).await?;
    if current_user.role != UserRole::Admin
        && !order.order.email.eq_ignore_ascii_case(&current_user.username)
    {
        // Same answer as a missing order so ids reveal nothing.
        return Err(AppError::NotFound("Order not found".to_string()));
    }
    Ok(ApiResponse::success(order))
}

/// POST /api/orders: guest checkout, no token required.
pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateOrder>,
) -> Result<(StatusCode, Json<ApiResponse<OrderWithDetails>>), AppError> {
    let order = order_service::create(&state.db, &body).await?;
    Ok(ApiResponse::created(order))
}

/// PUT /api/orders/:id (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<i32>,
    AppJson(body): AppJson<UpdateOrder>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = order_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(order))
}

/// DELETE /api/orders/:id (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    order_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
