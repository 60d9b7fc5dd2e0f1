use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::DeleteOutcome;
use crate::application::ports::category_repository::CategoryRepository;
use crate::domain::catalog::category::Category;
use crate::infrastructure::db::{PgPool, is_foreign_key_violation};

pub struct SqlxCategoryRepository {
    pub pool: PgPool,
}

impl SqlxCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_CATEGORY: &str = r#"SELECT c.id, c.name, c.description, c.parent_category_id,
           p.name AS parent_category_name, c.created_at
      FROM categories c
      LEFT JOIN categories p ON p.id = c.parent_category_id"#;

fn map_category(r: &PgRow) -> Category {
    Category {
        id: r.get("id"),
        name: r.get("name"),
        description: r.get("description"),
        parent_category_id: r.get("parent_category_id"),
        parent_category_name: r.get("parent_category_name"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query(&format!("{SELECT_CATEGORY} ORDER BY c.name"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_category).collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query(&format!("{SELECT_CATEGORY} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_category))
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_category_id: Option<Uuid>,
    ) -> anyhow::Result<Category> {
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO categories (name, description, parent_category_id)
               VALUES ($1, $2, $3) RETURNING id"#,
        )
        .bind(name)
        .bind(description)
        .bind(parent_category_id)
        .fetch_one(&self.pool)
        .await?;
        self.get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("category {id} vanished after insert"))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<DeleteOutcome> {
        match sqlx::query("DELETE FROM categories WHERE id = $1")
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
