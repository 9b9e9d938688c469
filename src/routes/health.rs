//! Health check endpoints for liveness and readiness.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::AppState;

/// Readiness detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

/// Liveness: OK whenever the process is serving requests.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness: 200 when the database answers, 503 otherwise. The cause is
/// logged, not returned.
pub async fn ready(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthStatus>>) {
    let (code, status, database) = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (StatusCode::OK, "ok", "connected"),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable", "unavailable")
        }
    };

    (
        code,
        ApiResponse::success(HealthStatus {
            status: status.to_string(),
            database: database.to_string(),
        }),
    )
}
