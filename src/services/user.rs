//! User management: profiles, password changes and admin maintenance.

use sqlx::PgPool;
use validator::Validate;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::{ChangePassword, UpdateUser, UpdateUserProfile, User, UserResponse};
use crate::services::auth::{hash_password, verify_password};
use crate::services::like_pattern;

/// Find a user by ID.
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Find a user by username.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username.trim())
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// List users, optionally filtered by a username/name substring.
pub async fn list(
    pool: &PgPool,
    search: Option<&str>,
    pagination: &Pagination,
) -> Result<PagedResult<UserResponse>, AppError> {
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users \
         WHERE ($1::text IS NULL OR username ILIKE $1 OR name ILIKE $1)",
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users \
         WHERE ($1::text IS NULL OR username ILIKE $1 OR name ILIKE $1) \
         ORDER BY id ASC LIMIT $2 OFFSET $3",
    )
    .bind(&pattern)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    let items = users.into_iter().map(UserResponse::from).collect();
    Ok(PagedResult::new(items, total, pagination))
}

/// Update the caller's own profile fields. Absent fields are left unchanged.
pub async fn update_profile(
    pool: &PgPool,
    id: i32,
    input: &UpdateUserProfile,
) -> Result<User, AppError> {
    input.validate()?;

    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            location = COALESCE($4, location),
            avatar = COALESCE($5, avatar),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.phone)
    .bind(&input.location)
    .bind(&input.avatar)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Change the caller's password after verifying the current one.
pub async fn change_password(
    pool: &PgPool,
    id: i32,
    input: &ChangePassword,
) -> Result<(), AppError> {
    input.validate()?;
    let user = find_by_id(pool, id).await?;

    if !verify_password(&input.current_password, &user.password_hash)? {
        return Err(AppError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = hash_password(&input.new_password)?;
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(&new_hash)
        .bind(id)
        .execute(pool)
        .await?;

    tracing::info!(user_id = id, "Password changed");
    Ok(())
}

/// Admin update of any user.
pub async fn update(pool: &PgPool, id: i32, input: &UpdateUser) -> Result<User, AppError> {
    if input.id.is_some_and(|body_id| body_id != id) {
        return Err(AppError::Validation(
            "Body id does not match path id".to_string(),
        ));
    }
    input.validate()?;

    let existing = find_by_id(pool, id).await?;
    let password_hash = match input.password.as_deref() {
        Some(p) => hash_password(p)?,
        None => existing.password_hash,
    };

    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            username = $2,
            password_hash = $3,
            role = $4,
            name = $5,
            phone = $6,
            location = $7,
            avatar = $8,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.username)
    .bind(&password_hash)
    .bind(input.role.unwrap_or(existing.role))
    .bind(&input.name)
    .bind(&input.phone)
    .bind(&input.location)
    .bind(&input.avatar)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Username already exists", "Invalid user reference"))
}

/// Delete a user by ID.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(())
}
