use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::DeleteOutcome;
use crate::application::ports::address_repository::AddressRepository;
use crate::domain::addresses::address::{Address, NewAddress};
use crate::infrastructure::db::{PgPool, is_foreign_key_violation};

pub struct SqlxAddressRepository {
    pub pool: PgPool,
}

impl SqlxAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ADDRESS_COLUMNS: &str =
    "id, user_id, street, city, state, zip_code, country, is_default, created_at";

fn map_address(r: &PgRow) -> Address {
    Address {
        id: r.get("id"),
        user_id: r.get("user_id"),
        street: r.get("street"),
        city: r.get("city"),
        state: r.get("state"),
        zip_code: r.get("zip_code"),
        country: r.get("country"),
        is_default: r.get("is_default"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl AddressRepository for SqlxAddressRepository {
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Address>> {
        let rows = sqlx::query(&format!(
            r#"SELECT {ADDRESS_COLUMNS} FROM addresses
               WHERE user_id = $1
               ORDER BY is_default DESC, created_at DESC"#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_address).collect())
    }

    async fn get_for_user(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Address>> {
        let row = sqlx::query(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_address))
    }

    async fn create(&self, user_id: Uuid, address: &NewAddress) -> anyhow::Result<Address> {
        let mut tx = self.pool.begin().await?;
        // Serialises concurrent creates for the same user around the default flag.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let has_any: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM addresses WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
        let is_default = address.is_default || !has_any;
        if is_default {
            sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1 AND is_default")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        let row = sqlx::query(&format!(
            r#"INSERT INTO addresses (user_id, street, city, state, zip_code, country, is_default)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {ADDRESS_COLUMNS}"#
        ))
        .bind(user_id)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(&address.country)
        .bind(is_default)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(map_address(&row))
    }

    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<DeleteOutcome> {
        let mut tx = self.pool.begin().await?;
        // Same lock as create, so the default flag cannot move underneath us.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let was_default: Option<bool> = match sqlx::query_scalar(
            "DELETE FROM addresses WHERE id = $1 AND user_id = $2 RETURNING is_default",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        {
            Ok(row) => row,
            Err(e) if is_foreign_key_violation(&e) => return Ok(DeleteOutcome::InUse),
            Err(e) => return Err(e.into()),
        };
        let Some(was_default) = was_default else {
            return Ok(DeleteOutcome::NotFound);
        };
        if was_default {
            sqlx::query(
                r#"UPDATE addresses SET is_default = TRUE
                   WHERE id = (SELECT id FROM addresses WHERE user_id = $1
                               ORDER BY created_at DESC, id DESC LIMIT 1)"#,
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }
}
