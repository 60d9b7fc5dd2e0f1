//! Demo catalogue and accounts for empty databases.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::services::credentials;
use crate::domain::users::user::UserRole;
use crate::infrastructure::db::PgPool;

pub const DEMO_PASSWORD: &str = "Password123!";

struct SeedProduct {
    name: &'static str,
    sku: &'static str,
    description: &'static str,
    // cents
    price: i64,
    stock: i32,
    category: usize,
}

const CATEGORIES: [(&str, &str); 3] = [
    ("Electronics", "Electronic devices and accessories"),
    ("Clothing", "Apparel and fashion"),
    ("Books", "Books and literature"),
];

const PRODUCTS: [SeedProduct; 4] = [
    SeedProduct {
        name: "Laptop Pro 15",
        sku: "ELEC-LAP-001",
        description: "High-performance laptop with 16GB RAM and 512GB SSD",
        price: 129_999,
        stock: 50,
        category: 0,
    },
    SeedProduct {
        name: "Wireless Mouse",
        sku: "ELEC-MOU-001",
        description: "Ergonomic wireless mouse with precision tracking",
        price: 2_999,
        stock: 200,
        category: 0,
    },
    SeedProduct {
        name: "Cotton T-Shirt",
        sku: "CLO-TSH-001",
        description: "Comfortable 100% cotton t-shirt",
        price: 1_999,
        stock: 150,
        category: 1,
    },
    SeedProduct {
        name: "Programming Guide",
        sku: "BOOK-PRG-001",
        description: "Comprehensive guide to modern programming",
        price: 4_999,
        stock: 75,
        category: 2,
    },
];

pub fn placeholder_image_url(product_name: &str) -> String {
    format!(
        "https://via.placeholder.com/400x400/FF9900/FFFFFF?text={}",
        product_name.replace(' ', "+")
    )
}

/// Seeds the demo data when no user exists yet. Returns whether anything was
/// written.
pub async fn seed_demo_data(pool: &PgPool) -> anyhow::Result<bool> {
    let has_users: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users)")
        .fetch_one(pool)
        .await?;
    if has_users {
        return Ok(false);
    }

    let password_hash = credentials::hash_password(DEMO_PASSWORD)?;
    let mut tx = pool.begin().await?;

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;
        category_ids.push(id);
    }

    let mut customer_id = None;
    for (email, first, last, role) in [
        ("admin@shopstream.com", "Admin", "User", UserRole::Admin),
        ("customer@example.com", "John", "Doe", UserRole::Customer),
    ] {
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO users (email, first_name, last_name, role, password_hash)
               VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(email)
        .bind(first)
        .bind(last)
        .bind(role.as_str())
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;
        if role == UserRole::Customer {
            customer_id = Some(id);
        }
    }

    for p in PRODUCTS.iter() {
        let product_id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO products (name, sku, description, price, stock_quantity, category_id, is_active)
               VALUES ($1, $2, $3, $4, $5, $6, TRUE) RETURNING id"#,
        )
        .bind(p.name)
        .bind(p.sku)
        .bind(p.description)
        .bind(Decimal::new(p.price, 2))
        .bind(p.stock)
        .bind(category_ids[p.category])
        .fetch_one(&mut *tx)
        .await?;
        sqlx::query(
            r#"INSERT INTO product_images (product_id, url, alt_text, display_order)
               VALUES ($1, $2, $3, 1)"#,
        )
        .bind(product_id)
        .bind(placeholder_image_url(p.name))
        .bind(p.name)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(user_id) = customer_id {
        sqlx::query(
            r#"INSERT INTO addresses (user_id, street, city, state, zip_code, country, is_default)
               VALUES ($1, '123 Main St', 'New York', 'NY', '10001', 'USA', TRUE)"#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        categories = CATEGORIES.len(),
        products = PRODUCTS.len(),
        "demo_data_seeded"
    );
    Ok(true)
}
