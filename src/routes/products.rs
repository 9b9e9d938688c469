//! Product routes: public catalogue reads, admin multipart writes.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::extract::{AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{
    Product, ProductFilters, ProductForm, ProductWithCategory, SuggestQuery,
};
use crate::services::product as product_service;
use crate::services::upload::{self as upload_service, StoredFile};
use crate::AppState;

/// Text fields plus the optional image file of a product form.
#[derive(Debug, Default)]
struct ProductMultipart {
    fields: HashMap<String, String>,
    image: Option<(String, Vec<u8>)>,
}

async fn read_product_multipart(mut multipart: Multipart) -> Result<ProductMultipart, AppError> {
    let mut form = ProductMultipart::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" | "photo" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                // Browsers send an empty part when no file was chosen.
                if !data.is_empty() {
                    form.image = Some((filename, data.to_vec()));
                }
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}

fn field<'a>(fields: &'a HashMap<String, String>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|n| fields.get(*n))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn required<'a>(fields: &'a HashMap<String, String>, names: &[&str]) -> Result<&'a str, AppError> {
    field(fields, names).ok_or_else(|| AppError::Validation(format!("{} is required", names[0])))
}

/// Build and validate a [`ProductForm`] from multipart text fields.
fn parse_product_form(fields: &HashMap<String, String>) -> Result<ProductForm, AppError> {
    let name = required(fields, &["name"])?.to_string();
    let price = required(fields, &["price"])?
        .parse()
        .map_err(|e| AppError::Validation(format!("price: {e}")))?;
    let quantity = required(fields, &["quantity"])?
        .parse()
        .map_err(|_| AppError::Validation("quantity must be a whole number".to_string()))?;
    let category_id = required(fields, &["categoryId", "category_id", "category"])?
        .parse()
        .map_err(|_| AppError::Validation("categoryId must be a number".to_string()))?;
    let note = field(fields, &["note"]).unwrap_or_default().to_string();

    let form = ProductForm {
        name,
        price,
        quantity,
        note,
        category_id,
    };
    form.validate()?;
    Ok(form)
}

/// Store the uploaded image, if any.
async fn store_image(
    state: &AppState,
    image: Option<(String, Vec<u8>)>,
) -> Result<Option<StoredFile>, AppError> {
    match image {
        Some((filename, data)) => {
            let stored =
                upload_service::save_image(&state.config.upload_dir, &filename, &data).await?;
            Ok(Some(stored))
        }
        None => Ok(None),
    }
}

/// Remove an image written for a product write that then failed.
async fn discard_image(state: &AppState, stored: Option<StoredFile>) {
    if let Some(stored) = stored {
        upload_service::remove_image(&state.config.upload_dir, &stored.file_name).await;
    }
}

/// GET /api/products: paginated list, filtered by `searchTerm` and `categoryId`.
pub async fn list(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<Pagination>,
    AppQuery(filters): AppQuery<ProductFilters>,
) -> Result<Json<ApiResponse<PagedResult<ProductWithCategory>>>, AppError> {
    let result = product_service::list_paginated(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/products/all: every product, unpaginated.
pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductWithCategory>>>, AppError> {
    let products = product_service::list_all(&state.db).await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ApiResponse<ProductWithCategory>>, AppError> {
    let product = product_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(product))
}

/// GET /api/products/suggest-product?search=
pub async fn suggest(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SuggestQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = product_service::suggest(&state.db, query.search.as_deref()).await?;
    Ok(ApiResponse::success(products))
}

/// POST /api/products (admin, multipart)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    let upload = read_product_multipart(multipart).await?;
    let form = parse_product_form(&upload.fields)?;
    let stored = store_image(&state, upload.image).await?;
    let image = stored.as_ref().map(|s| s.path.as_str());

    match product_service::create(&state.db, &form, image).await {
        Ok(product) => Ok(ApiResponse::created(product)),
        Err(e) => {
            discard_image(&state, stored).await;
            Err(e)
        }
    }
}

/// PUT /api/products/:id (admin, multipart): keeps the current image unless a new one is sent.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let upload = read_product_multipart(multipart).await?;
    let form = parse_product_form(&upload.fields)?;
    // 404 before writing a file for a product that does not exist.
    product_service::find_by_id(&state.db, id).await?;
    let stored = store_image(&state, upload.image).await?;
    let image = stored.as_ref().map(|s| s.path.as_str());

    match product_service::update(&state.db, id, &form, image).await {
        Ok(product) => Ok(ApiResponse::success(product)),
        Err(e) => {
            discard_image(&state, stored).await;
            Err(e)
        }
    }
}

/// DELETE /api/products/:id (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    product_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_client_form() {
        let form = parse_product_form(&fields(&[
            ("name", "Yoga Mat Premium"),
            ("price", "59.99"),
            ("quantity", "150"),
            ("note", "Non-slip"),
            ("category", "4"),
        ]))
        .unwrap();
        assert_eq!(form.name, "Yoga Mat Premium");
        assert_eq!(form.price.cents(), 5999);
        assert_eq!(form.quantity, 150);
        assert_eq!(form.category_id, 4);
        assert_eq!(form.note, "Non-slip");
    }

    #[test]
    fn category_id_takes_precedence_over_category() {
        let form = parse_product_form(&fields(&[
            ("name", "Lamp"),
            ("price", "1"),
            ("quantity", "1"),
            ("categoryId", "2"),
            ("category", "9"),
        ]))
        .unwrap();
        assert_eq!(form.category_id, 2);
        assert_eq!(form.note, "");
    }

    #[test]
    fn missing_fields_reported() {
        let err = parse_product_form(&fields(&[("name", "Lamp")])).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "price is required"));
    }

    #[test]
    fn whitespace_name_is_missing() {
        let err = parse_product_form(&fields(&[
            ("name", "   "),
            ("price", "1"),
            ("quantity", "1"),
            ("categoryId", "1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "name is required"));
    }

    #[test]
    fn overlong_name_rejected_before_storage() {
        let long = "x".repeat(201);
        let err = parse_product_form(&fields(&[
            ("name", long.as_str()),
            ("price", "1"),
            ("quantity", "1"),
            ("categoryId", "1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.starts_with("name:")));
    }

    #[tokio::test]
    async fn discarded_image_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = crate::test_support::offline_state();
        state.config.upload_dir = dir.path().to_path_buf();

        let stored = store_image(&state, Some(("a.png".to_string(), vec![1, 2, 3])))
            .await
            .unwrap()
            .unwrap();
        assert!(dir.path().join(&stored.file_name).exists());

        let file_name = stored.file_name.clone();
        discard_image(&state, Some(stored)).await;
        assert!(!dir.path().join(&file_name).exists());
    }

    #[tokio::test]
    async fn create_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = crate::test_support::offline_state();
        state.config.upload_dir = dir.path().to_path_buf();

        // The database is unreachable, so the insert fails after the image is written.
        let stored = store_image(&state, Some(("b.gif".to_string(), vec![7; 8])))
            .await
            .unwrap();
        let form = parse_product_form(&fields(&[
            ("name", "Lamp"),
            ("price", "1"),
            ("quantity", "1"),
            ("categoryId", "1"),
        ]))
        .unwrap();
        let image = stored.as_ref().map(|s| s.path.as_str());
        assert!(product_service::create(&state.db, &form, image).await.is_err());
        discard_image(&state, stored).await;

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn bad_numbers_reported() {
        let err = parse_product_form(&fields(&[
            ("name", "Lamp"),
            ("price", "12.345"),
            ("quantity", "1"),
            ("categoryId", "1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.starts_with("price:")));

        let err = parse_product_form(&fields(&[
            ("name", "Lamp"),
            ("price", "12"),
            ("quantity", "many"),
            ("categoryId", "1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
