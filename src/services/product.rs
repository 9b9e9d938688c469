//! Product service: catalogue CRUD, filtered pagination and name suggestions.

use sqlx::PgPool;
use validator::Validate;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{
    Product, ProductCategoryRow, ProductFilters, ProductForm, ProductWithCategory,
};
use crate::services::like_pattern;

/// Maximum rows returned by the suggestion endpoint.
const SUGGEST_LIMIT: i64 = 10;

const SELECT_WITH_CATEGORY: &str = "SELECT p.*, c.name AS category_name, c.brand AS category_brand \
     FROM products p JOIN categories c ON c.id = p.category_id";

const MISSING_CATEGORY: &str = "Category does not exist";

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

/// Find product by ID, including its category.
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<ProductWithCategory, AppError> {
    sqlx::query_as::<_, ProductCategoryRow>(&format!("{SELECT_WITH_CATEGORY} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(ProductWithCategory::from)
        .ok_or_else(not_found)
}

/// List every product with its category.
pub async fn list_all(pool: &PgPool) -> Result<Vec<ProductWithCategory>, AppError> {
    let rows = sqlx::query_as::<_, ProductCategoryRow>(&format!(
        "{SELECT_WITH_CATEGORY} ORDER BY p.id ASC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(ProductWithCategory::from).collect())
}

/// List products page by page, filtered by name substring and category.
pub async fn list_paginated(
    pool: &PgPool,
    filters: &ProductFilters,
    pagination: &Pagination,
) -> Result<PagedResult<ProductWithCategory>, AppError> {
    let search = filters
        .search_term
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);

    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if search.is_some() {
        param_index += 1;
        conditions.push(format!("p.name ILIKE ${param_index}"));
    }
    if filters.category_id.is_some() {
        param_index += 1;
        conditions.push(format!("p.category_id = ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM products p {where_clause}");
    let data_sql = format!(
        "{SELECT_WITH_CATEGORY} {where_clause} ORDER BY p.id ASC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, ProductCategoryRow>(&data_sql);

    if let Some(ref pattern) = search {
        count_query = count_query.bind(pattern.clone());
        data_query = data_query.bind(pattern.clone());
    }
    if let Some(category_id) = filters.category_id {
        count_query = count_query.bind(category_id);
        data_query = data_query.bind(category_id);
    }

    let total = count_query.fetch_one(pool).await?;
    let rows = data_query.fetch_all(pool).await?;
    let items = rows.into_iter().map(ProductWithCategory::from).collect();

    Ok(PagedResult::new(items, total, pagination))
}

/// Create a product, stamping its date with the current time.
pub async fn create(
    pool: &PgPool,
    form: &ProductForm,
    image: Option<&str>,
) -> Result<Product, AppError> {
    form.validate()?;

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, price_cents, quantity, note, category_id, image, date)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING *
        "#,
    )
    .bind(&form.name)
    .bind(form.price)
    .bind(form.quantity)
    .bind(&form.note)
    .bind(form.category_id)
    .bind(image)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Product already exists", MISSING_CATEGORY))?;

    tracing::info!(product_id = product.id, name = %product.name, "Product created");
    Ok(product)
}

/// Update a product. The stored image is kept unless `new_image` is given.
pub async fn update(
    pool: &PgPool,
    id: i32,
    form: &ProductForm,
    new_image: Option<&str>,
) -> Result<Product, AppError> {
    form.validate()?;

    sqlx::query_as::<_, Product>(
        r#"
        UPDATE products SET
            name = $2,
            price_cents = $3,
            quantity = $4,
            note = $5,
            category_id = $6,
            image = COALESCE($7, image)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&form.name)
    .bind(form.price)
    .bind(form.quantity)
    .bind(&form.note)
    .bind(form.category_id)
    .bind(new_image)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Product already exists", MISSING_CATEGORY))?
    .ok_or_else(not_found)
}

/// Delete a product by ID.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(())
}

/// Products whose name contains `search`. Blank input yields no suggestions.
pub async fn suggest(pool: &PgPool, search: Option<&str>) -> Result<Vec<Product>, AppError> {
    let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };

    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE name ILIKE $1 ORDER BY name ASC LIMIT $2",
    )
    .bind(like_pattern(term))
    .bind(SUGGEST_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(products)
}
