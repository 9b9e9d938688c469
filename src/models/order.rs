//! Orders and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::money::Money;
use crate::models::product::Product;
use crate::models::{blank_as_none, trimmed};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i32,
    /// Human-facing reference number, e.g. `ORD-001`.
    pub order_ref: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Total order value.
    #[sqlx(rename = "price_cents")]
    pub price: Money,
    pub note: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderDetail {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    /// Unit price at the time of ordering.
    #[sqlx(rename = "price_cents")]
    pub price: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetailWithProduct {
    #[serde(flatten)]
    pub detail: OrderDetail,
    pub product: Product,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWithDetails {
    #[serde(flatten)]
    pub order: Order,
    pub details: Vec<OrderDetailWithProduct>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderLine {
    pub product_id: i32,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    /// Unit price; the product's current price when omitted.
    pub price: Option<Money>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    /// Generated when missing or blank.
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 64))]
    pub order_ref: Option<String>,
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub note: String,
    /// Only used when the order has no lines.
    pub price: Option<Money>,
    #[serde(default)]
    #[validate(nested)]
    pub details: Vec<CreateOrderLine>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrder {
    pub id: Option<i32>,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 64, message = "order_ref must be 1-64 characters"))]
    pub order_ref: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub price: Money,
    #[serde(default)]
    pub note: String,
}
