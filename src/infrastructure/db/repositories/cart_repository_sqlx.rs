use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::cart_repository::CartRepository;
use crate::domain::carts::cart::{Cart, CartLine};
use crate::infrastructure::db::PgPool;

pub struct SqlxCartRepository {
    pub pool: PgPool,
}

impl SqlxCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for SqlxCartRepository {
    async fn get_or_create(&self, user_id: Uuid) -> anyhow::Result<Uuid> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO carts (user_id) VALUES ($1)
               ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
               RETURNING id"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn load(&self, cart_id: Uuid) -> anyhow::Result<Cart> {
        let user_id: Uuid = sqlx::query_scalar("SELECT user_id FROM carts WHERE id = $1")
            .bind(cart_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| anyhow::anyhow!("cart {cart_id} not found"))?;
        let rows = sqlx::query(
            r#"SELECT ci.id, ci.product_id, p.name AS product_name, ci.quantity, ci.unit_price,
                      (SELECT pi.url FROM product_images pi
                        WHERE pi.product_id = ci.product_id
                        ORDER BY pi.display_order, pi.id LIMIT 1) AS image_url
               FROM cart_items ci
               JOIN products p ON p.id = ci.product_id
               WHERE ci.cart_id = $1
               ORDER BY ci.created_at, ci.id"#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;
        let lines = rows
            .into_iter()
            .map(|r| CartLine {
                id: r.get("id"),
                product_id: r.get("product_id"),
                product_name: r.get("product_name"),
                quantity: r.get("quantity"),
                unit_price: r.get("unit_price"),
                image_url: r.get("image_url"),
            })
            .collect();
        Ok(Cart {
            id: cart_id,
            user_id,
            lines,
        })
    }

    async fn insert_line(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> anyhow::Result<Option<Uuid>> {
        // A concurrent add of the same product lands on the unique key and merges,
        // unless the merged quantity would exceed the stock (no row comes back).
        let id: Option<Uuid> = sqlx::query_scalar(
            r#"INSERT INTO cart_items (cart_id, product_id, quantity, unit_price)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (cart_id, product_id) DO UPDATE
                 SET quantity = cart_items.quantity + EXCLUDED.quantity,
                     unit_price = EXCLUDED.unit_price
                 WHERE cart_items.quantity + EXCLUDED.quantity <=
                       (SELECT stock_quantity FROM products WHERE id = EXCLUDED.product_id)
               RETURNING id"#,
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_optional(&self.pool)
        .await?;
        if id.is_some() {
            self.touch(cart_id).await?;
        }
        Ok(id)
    }

    async fn update_line(
        &self,
        cart_id: Uuid,
        line_id: Uuid,
        quantity: i32,
        unit_price: Option<Decimal>,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE cart_items
               SET quantity = $3, unit_price = COALESCE($4, unit_price)
               WHERE cart_id = $1 AND id = $2"#,
        )
        .bind(cart_id)
        .bind(line_id)
        .bind(quantity)
        .bind(unit_price)
        .execute(&self.pool)
        .await?;
        self.touch(cart_id).await?;
        Ok(res.rows_affected() > 0)
    }

    async fn remove_line(&self, cart_id: Uuid, line_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND id = $2")
            .bind(cart_id)
            .bind(line_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn clear(&self, cart_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}

impl SqlxCartRepository {
    async fn touch(&self, cart_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
