//! Order service: orders with their line items and product snapshots.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::money::Money;
use crate::models::order::{
    CreateOrder, CreateOrderLine, Order, OrderDetail, OrderDetailWithProduct, OrderWithDetails,
    UpdateOrder,
};
use crate::models::product::Product;

fn not_found() -> AppError {
    AppError::NotFound("Order not found".to_string())
}

/// Generate a reference number of the form `ORD-1A2B3C4D`.
pub fn generate_order_ref() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", id[..8].to_ascii_uppercase())
}

/// Sum `quantity × unit price` across priced lines.
pub fn order_total(lines: &[(i32, Money)]) -> Result<Money, AppError> {
    lines
        .iter()
        .try_fold(Money::ZERO, |acc, (quantity, unit)| {
            unit.checked_mul(*quantity)
                .and_then(|line| acc.checked_add(line))
        })
        .ok_or_else(|| AppError::Validation("Order total is too large".to_string()))
}

/// Attach line items (and their products) to each order, preserving order.
async fn with_details(pool: &PgPool, orders: Vec<Order>) -> Result<Vec<OrderWithDetails>, AppError> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }
    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();

    let details = sqlx::query_as::<_, OrderDetail>(
        "SELECT * FROM order_details WHERE order_id = ANY($1) ORDER BY id ASC",
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let product_ids: Vec<i32> = details.iter().map(|d| d.product_id).collect();
    let products: HashMap<i32, Product> =
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
            .bind(&product_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

    let mut by_order: HashMap<i32, Vec<OrderDetailWithProduct>> = HashMap::new();
    for detail in details {
        // Lines cascade with their product, so a missing product means a concurrent delete.
        let Some(product) = products.get(&detail.product_id).cloned() else {
            continue;
        };
        by_order
            .entry(detail.order_id)
            .or_default()
            .push(OrderDetailWithProduct { detail, product });
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let details = by_order.remove(&order.id).unwrap_or_default();
            OrderWithDetails { order, details }
        })
        .collect())
}

/// Find order by ID with details and products.
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<OrderWithDetails, AppError> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(not_found)?;

    with_details(pool, vec![order])
        .await?
        .pop()
        .ok_or_else(not_found)
}

/// List all orders, newest first, with details.
pub async fn list_all(pool: &PgPool) -> Result<Vec<OrderWithDetails>, AppError> {
    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY date DESC, id DESC")
        .fetch_all(pool)
        .await?;
    with_details(pool, orders).await
}

/// Resolve each line's unit price, falling back to the product's current price.
async fn price_lines(
    tx: &mut sqlx::PgConnection,
    lines: &[CreateOrderLine],
) -> Result<Vec<(i32, i32, Money)>, AppError> {
    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        let current: Option<Money> =
            sqlx::query_scalar("SELECT price_cents FROM products WHERE id = $1")
                .bind(line.product_id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = current.ok_or_else(|| {
            AppError::Validation(format!("Product {} does not exist", line.product_id))
        })?;
        priced.push((line.product_id, line.quantity, line.price.unwrap_or(current)));
    }
    Ok(priced)
}

/// Create an order and its lines in one transaction.
pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<OrderWithDetails, AppError> {
    input.validate()?;

    let mut tx = pool.begin().await?;

    let lines = price_lines(&mut tx, &input.details).await?;
    let total = if lines.is_empty() {
        input.price.unwrap_or(Money::ZERO)
    } else {
        let quantities: Vec<(i32, Money)> = lines.iter().map(|(_, q, p)| (*q, *p)).collect();
        order_total(&quantities)?
    };

    let order_ref = input
        .order_ref
        .as_deref()
        .map(|r| r.trim().to_string())
        .unwrap_or_else(generate_order_ref);

    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (order_ref, email, phone, address, price_cents, note, date)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING *
        "#,
    )
    .bind(&order_ref)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.address)
    .bind(total)
    .bind(&input.note)
    .fetch_one(&mut *tx)
    .await?;

    for (product_id, quantity, price) in &lines {
        sqlx::query(
            "INSERT INTO order_details (order_id, product_id, quantity, price_cents) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order.id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        order_ref = %order.order_ref,
        lines = lines.len(),
        total = %total,
        "Order created"
    );
    find_by_id(pool, order.id).await
}

/// Update order header fields. A body `id`, when present, must match the path.
pub async fn update(pool: &PgPool, id: i32, input: &UpdateOrder) -> Result<Order, AppError> {
    if input.id.is_some_and(|body_id| body_id != id) {
        return Err(AppError::Validation(
            "Body id does not match path id".to_string(),
        ));
    }
    input.validate()?;

    sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders SET
            order_ref = $2,
            email = $3,
            phone = $4,
            address = $5,
            price_cents = $6,
            note = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.order_ref)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.address)
    .bind(input.price)
    .bind(&input.note)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

/// Delete an order; its lines cascade.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    tracing::info!(order_id = id, "Order deleted");
    Ok(())
}
