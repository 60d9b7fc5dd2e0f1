use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::application::ports::DeleteOutcome;
use crate::application::ports::product_repository::ProductRepository;
use crate::domain::catalog::product::{Page, Product, ProductFields, ProductImage, ProductQuery};
use crate::infrastructure::db::{PgPool, is_foreign_key_violation};

pub struct SqlxProductRepository {
    pub pool: PgPool,
}

impl SqlxProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn images_for(&self, ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, Vec<ProductImage>>> {
        let mut out: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
        if ids.is_empty() {
            return Ok(out);
        }
        let rows = sqlx::query(
            r#"SELECT id, product_id, url, alt_text, display_order
               FROM product_images
               WHERE product_id = ANY($1)
               ORDER BY display_order, id"#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        for r in rows {
            out.entry(r.get("product_id")).or_default().push(ProductImage {
                id: r.get("id"),
                url: r.get("url"),
                alt_text: r.get("alt_text"),
                display_order: r.get("display_order"),
            });
        }
        Ok(out)
    }
}

const SELECT_PRODUCT: &str = r#"SELECT p.id, p.name, p.sku, p.description, p.price, p.stock_quantity,
           p.category_id, c.name AS category_name, p.is_active, p.created_at, p.updated_at
      FROM products p
      JOIN categories c ON c.id = p.category_id"#;

fn map_product(r: &PgRow) -> Product {
    Product {
        id: r.get("id"),
        name: r.get("name"),
        sku: r.get("sku"),
        description: r.get("description"),
        price: r.get("price"),
        stock_quantity: r.get("stock_quantity"),
        category_id: r.get("category_id"),
        category_name: r.get("category_name"),
        is_active: r.get("is_active"),
        images: Vec::new(),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) {
    qb.push(" WHERE TRUE");
    if let Some(term) = &query.search {
        let like = format!("%{}%", escape_like(term));
        qb.push(" AND (p.name ILIKE ")
            .push_bind(like.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(like)
            .push(")");
    }
    if let Some(category_id) = query.category_id {
        qb.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(min) = query.min_price {
        qb.push(" AND p.price >= ").push_bind(min);
    }
    if let Some(max) = query.max_price {
        qb.push(" AND p.price <= ").push_bind(max);
    }
}

#[async_trait]
impl ProductRepository for SqlxProductRepository {
    async fn list(&self, query: &ProductQuery) -> anyhow::Result<Page<Product>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_PRODUCT);
        push_filters(&mut select, query);
        select
            .push(" ORDER BY ")
            .push(query.sort.column())
            .push(if query.descending { " DESC" } else { " ASC" })
            .push(", p.id LIMIT ")
            .push_bind(query.page_size)
            .push(" OFFSET ")
            .push_bind(query.offset());
        let rows = select.build().fetch_all(&self.pool).await?;

        let mut items: Vec<Product> = rows.iter().map(map_product).collect();
        let ids: Vec<Uuid> = items.iter().map(|p| p.id).collect();
        let mut images = self.images_for(&ids).await?;
        for p in items.iter_mut() {
            p.images = images.remove(&p.id).unwrap_or_default();
        }
        Ok(Page::new(items, total, query.page, query.page_size))
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query(&format!("{SELECT_PRODUCT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(mut product) = row.as_ref().map(map_product) else {
            return Ok(None);
        };
        product.images = self
            .images_for(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(Some(product))
    }

    async fn create(&self, sku: &str, fields: &ProductFields) -> anyhow::Result<Option<Uuid>> {
        let id: Option<Uuid> = sqlx::query_scalar(
            r#"INSERT INTO products (name, sku, description, price, stock_quantity, category_id, is_active)
               VALUES ($1, $2, $3, $4, $5, $6, TRUE)
               ON CONFLICT (sku) DO NOTHING
               RETURNING id"#,
        )
        .bind(&fields.name)
        .bind(sku)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.stock_quantity)
        .bind(fields.category_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(
        &self,
        id: Uuid,
        fields: &ProductFields,
        is_active: bool,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE products
               SET name = $2, description = $3, price = $4, stock_quantity = $5,
                   category_id = $6, is_active = $7, updated_at = now()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.stock_quantity)
        .bind(fields.category_id)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<DeleteOutcome> {
        match sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) if res.rows_affected() > 0 => Ok(DeleteOutcome::Deleted),
            Ok(_) => Ok(DeleteOutcome::NotFound),
            Err(e) if is_foreign_key_violation(&e) => Ok(DeleteOutcome::InUse),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("mouse"), "mouse");
    }

    #[test]
    fn filters_bind_in_order() {
        let mut query = ProductQuery::default();
        query.search = Some("lap".into());
        query.category_id = Some(Uuid::nil());
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut qb, &query);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM products p WHERE TRUE AND (p.name ILIKE $1 OR p.description ILIKE $2) AND p.category_id = $3"
        );
    }
}
