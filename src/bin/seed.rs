//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Every step is idempotent.

use sqlx::PgPool;

use nashstore::models::money::Money;
use nashstore::models::user::UserRole;
use nashstore::services::auth::hash_password;

const CATEGORIES: &[(&str, &str)] = &[
    ("Electronics", "Tech"),
    ("Clothing", "Fashion"),
    ("Books", "Literature"),
    ("Sports", "Fitness"),
    ("Home", "Living"),
];

const USERS: &[(&str, UserRole, &str)] = &[
    ("admin@nashstore.com", UserRole::Admin, "Admin123!"),
    ("customer@nashstore.com", UserRole::Customer, "Customer123!"),
    ("jane.smith@example.com", UserRole::Customer, "Password123!"),
];

/// (category, name, note, price, quantity, image)
const PRODUCTS: &[(&str, &str, &str, &str, i32, &str)] = &[
    (
        "Electronics",
        "iPhone 15 Pro",
        "Latest Apple smartphone with A17 Pro chip, titanium design, and advanced camera system. Features 6.1-inch Super Retina XDR display.",
        "999.99",
        50,
        "https://images.unsplash.com/photo-1592750475338-74b7b21085ab?w=500",
    ),
    (
        "Electronics",
        "Samsung Galaxy S24 Ultra",
        "Premium Android smartphone with S Pen, 200MP camera, and AI-powered features. 6.8-inch Dynamic AMOLED display.",
        "1199.99",
        35,
        "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=500",
    ),
    (
        "Electronics",
        "MacBook Air M3",
        "Ultra-thin laptop with Apple M3 chip, 13.6-inch Liquid Retina display, and up to 18 hours of battery life.",
        "1299.99",
        25,
        "https://images.unsplash.com/photo-1541807084-5c52b6b3adef?w=500",
    ),
    (
        "Electronics",
        "Sony WH-1000XM5 Headphones",
        "Industry-leading noise canceling wireless headphones with 30-hour battery life and premium sound quality.",
        "399.99",
        60,
        "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=500",
    ),
    (
        "Clothing",
        "Nike Air Max 270",
        "Comfortable lifestyle shoes with Max Air unit in the heel and breathable mesh upper. Perfect for everyday wear.",
        "149.99",
        100,
        "https://images.unsplash.com/photo-1549298916-b41d501d3772?w=500",
    ),
    (
        "Clothing",
        "Levi's 501 Original Jeans",
        "Classic straight-fit jeans with button fly. Made from 100% cotton denim with authentic vintage styling.",
        "89.99",
        75,
        "https://images.unsplash.com/photo-1542272604-787c3835535d?w=500",
    ),
    (
        "Clothing",
        "Adidas Ultraboost 22",
        "High-performance running shoes with Boost midsole technology and Primeknit upper for maximum comfort.",
        "189.99",
        80,
        "https://images.unsplash.com/photo-1600185365483-26d7a4cc7519?w=500",
    ),
    (
        "Books",
        "Clean Code by Robert Martin",
        "A handbook of agile software craftsmanship. Essential reading for any developer looking to write better code.",
        "44.99",
        120,
        "https://images.unsplash.com/photo-1532012197267-da84d127e765?w=500",
    ),
    (
        "Books",
        "The Pragmatic Programmer",
        "Your journey to mastery. Updated for the modern software development landscape with new insights and practices.",
        "49.99",
        95,
        "https://images.unsplash.com/photo-1481627834876-b7833e8f5570?w=500",
    ),
    (
        "Sports",
        "Yoga Mat Premium",
        "High-quality non-slip yoga mat with extra cushioning. Perfect for yoga, pilates, and general fitness exercises.",
        "59.99",
        150,
        "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=500",
    ),
    (
        "Sports",
        "Adjustable Dumbbells Set",
        "Space-saving adjustable dumbbells with weight range from 5 to 50 pounds. Perfect for home workouts.",
        "299.99",
        40,
        "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=500",
    ),
    (
        "Home",
        "Smart Home Security Camera",
        "Wireless security camera with 1080p HD video, night vision, and smartphone alerts. Easy installation.",
        "129.99",
        85,
        "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=500",
    ),
    (
        "Home",
        "LED Desk Lamp",
        "Modern LED desk lamp with adjustable brightness, USB charging port, and sleek minimalist design.",
        "79.99",
        110,
        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=500",
    ),
];

/// (ref, customer email, phone, address, total, note, days ago, product indexes)
const ORDERS: &[(&str, &str, &str, &str, &str, &str, i32, &[usize])] = &[
    (
        "ORD-001",
        "customer@nashstore.com",
        "123-456-7890",
        "123 Main St, City, State 12345",
        "1149.98",
        "Rush delivery requested",
        10,
        &[0, 1],
    ),
    (
        "ORD-002",
        "jane.smith@example.com",
        "987-654-3210",
        "456 Oak Ave, City, State 67890",
        "439.98",
        "Gift wrap requested",
        5,
        &[2, 3],
    ),
    (
        "ORD-003",
        "customer@nashstore.com",
        "123-456-7890",
        "123 Main St, City, State 12345",
        "89.99",
        "Standard shipping",
        2,
        &[4],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = nashstore::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    nashstore::db::migrate(&pool).await?;

    println!("=== NashStore Seed Script ===");

    seed_categories(&pool).await?;
    seed_users(&pool).await?;
    seed_products(&pool).await?;
    seed_orders(&pool).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: {} / {}", USERS[0].0, USERS[0].2);

    Ok(())
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<()> {
    let mut created = 0;
    for (name, brand) in CATEGORIES {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1)")
                .bind(name)
                .fetch_one(pool)
                .await?;
        if exists {
            continue;
        }
        sqlx::query("INSERT INTO categories (name, brand) VALUES ($1, $2)")
            .bind(name)
            .bind(brand)
            .execute(pool)
            .await?;
        created += 1;
    }
    println!("[done] Categories: {created} created");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Users already exist ({count})");
        return Ok(());
    }

    for (username, role, password) in USERS {
        let hash = hash_password(password)?;
        sqlx::query("INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3)")
            .bind(username)
            .bind(&hash)
            .bind(role)
            .execute(pool)
            .await?;
    }

    println!("[done] Created {} users", USERS.len());
    Ok(())
}

async fn seed_products(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Products already exist ({count})");
        return Ok(());
    }

    for (category, name, note, price, quantity, image) in PRODUCTS {
        let price: Money = price.parse()?;
        sqlx::query(
            "INSERT INTO products (name, note, price_cents, quantity, category_id, image)
             SELECT $1, $2, $3, $4, c.id, $6 FROM categories c WHERE c.name = $5
             ORDER BY c.id LIMIT 1",
        )
        .bind(name)
        .bind(note)
        .bind(price)
        .bind(quantity)
        .bind(category)
        .bind(image)
        .execute(pool)
        .await?;
    }

    println!("[done] Created {} products", PRODUCTS.len());
    Ok(())
}

async fn seed_orders(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Orders already exist ({count})");
        return Ok(());
    }

    let products: Vec<(i32, Money)> =
        sqlx::query_as("SELECT id, price_cents FROM products ORDER BY id LIMIT 5")
            .fetch_all(pool)
            .await?;

    let mut tx = pool.begin().await?;
    let mut lines = 0;

    for (order_ref, email, phone, address, total, note, days_ago, items) in ORDERS {
        let total: Money = total.parse()?;
        let order_id: i32 = sqlx::query_scalar(
            "INSERT INTO orders (order_ref, email, phone, address, price_cents, note, date)
             VALUES ($1, $2, $3, $4, $5, $6, NOW() - make_interval(days => $7))
             RETURNING id",
        )
        .bind(order_ref)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(total)
        .bind(note)
        .bind(*days_ago)
        .fetch_one(&mut *tx)
        .await?;

        for (product_id, price) in items.iter().filter_map(|i| products.get(*i)) {
            sqlx::query(
                "INSERT INTO order_details (order_id, product_id, quantity, price_cents)
                 VALUES ($1, $2, 1, $3)",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(price)
            .execute(&mut *tx)
            .await?;
            lines += 1;
        }
    }

    tx.commit().await?;
    println!("[done] Created {} orders with {lines} lines", ORDERS.len());
    Ok(())
}
