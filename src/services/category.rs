//! Category service: CRUD over `categories`.

use sqlx::PgPool;
use validator::Validate;

use crate::errors::AppError;
use crate::models::category::{Category, CategoryInput};

fn not_found() -> AppError {
    AppError::NotFound("Category not found".to_string())
}

/// Find category by ID.
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Category, AppError> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(not_found)
}

/// List every category.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id ASC")
        .fetch_all(pool)
        .await?;
    Ok(categories)
}

/// Create a category.
pub async fn create(pool: &PgPool, input: &CategoryInput) -> Result<Category, AppError> {
    input.validate()?;

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, brand) VALUES ($1, $2) RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.brand)
    .fetch_one(pool)
    .await?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");
    Ok(category)
}

/// Update a category. A body `id`, when present, must match the path.
pub async fn update(pool: &PgPool, id: i32, input: &CategoryInput) -> Result<Category, AppError> {
    if input.id.is_some_and(|body_id| body_id != id) {
        return Err(AppError::Validation(
            "Body id does not match path id".to_string(),
        ));
    }
    input.validate()?;

    sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $2, brand = $3 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.brand)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

/// Delete a category and, through the foreign key, its products.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    tracing::info!(category_id = id, "Category deleted");
    Ok(())
}
