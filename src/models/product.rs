//! Catalogue products and the multipart form used to write them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::category::Category;
use crate::models::money::Money;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    #[sqlx(rename = "price_cents")]
    pub price: Money,
    pub quantity: i32,
    pub note: String,
    pub category_id: i32,
    pub image: Option<String>,
    pub date: DateTime<Utc>,
}

/// Product joined with its category, as returned by detail and list views.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
}

/// Flat row for `products JOIN categories`.
#[derive(Debug, Clone, FromRow)]
pub struct ProductCategoryRow {
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: String,
    pub category_brand: String,
}

impl From<ProductCategoryRow> for ProductWithCategory {
    fn from(row: ProductCategoryRow) -> Self {
        let category = Category {
            id: row.product.category_id,
            name: row.category_name,
            brand: row.category_brand,
        };
        Self {
            product: row.product,
            category,
        }
    }
}

/// Validated product fields collected from a multipart form.
#[derive(Debug, Clone, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    pub price: Money,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
    pub note: String,
    pub category_id: i32,
}

/// Query parameters for `GET /api/products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilters {
    #[serde(rename = "searchTerm", alias = "search_term", alias = "search")]
    pub search_term: Option<String>,
    #[serde(rename = "categoryId", alias = "category_id")]
    pub category_id: Option<i32>,
}

/// Query parameters for `GET /api/products/suggest-product`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestQuery {
    pub search: Option<String>,
    pub category: Option<i32>,
}
