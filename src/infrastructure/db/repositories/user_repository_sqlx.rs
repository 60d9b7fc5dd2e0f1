use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{NewUser, UserRepository, UserRow};
use crate::infrastructure::db::PgPool;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, email, first_name, last_name, role, password_hash, created_at";

fn map_user(r: &PgRow) -> anyhow::Result<UserRow> {
    let role: String = r.get("role");
    Ok(UserRow {
        id: r.get("id"),
        email: r.get("email"),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        role: role.parse()?,
        password_hash: r.try_get("password_hash").ok(),
        created_at: r.get("created_at"),
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(&self, user: &NewUser<'_>) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO users (email, first_name, last_name, role, password_hash)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (email) DO NOTHING
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(user.email)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.role.as_str())
        .bind(user.password_hash)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn store_reset_token(
        &self,
        user_id: Uuid,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"UPDATE users
               SET reset_token_digest = $2, reset_token_expires_at = $3, updated_at = now()
               WHERE id = $1"#,
        )
        .bind(user_id)
        .bind(token_digest)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_digest: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(&format!(
            r#"SELECT {USER_COLUMNS} FROM users
               WHERE reset_token_digest = $1 AND reset_token_expires_at > $2"#
        ))
        .bind(token_digest)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE users
               SET password_hash = $2, reset_token_digest = NULL,
                   reset_token_expires_at = NULL, updated_at = now()
               WHERE id = $1"#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn clear_expired_reset_tokens(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"UPDATE users
               SET reset_token_digest = NULL, reset_token_expires_at = NULL
               WHERE reset_token_expires_at IS NOT NULL AND reset_token_expires_at <= $1"#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }
}
