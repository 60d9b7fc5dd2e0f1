use async_trait::async_trait;

use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::infrastructure::db::PgPool;

pub struct SqlxAuditLogRepository {
    pub pool: PgPool,
}

impl SqlxAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for SqlxAuditLogRepository {
    async fn record(&self, event: &AuditEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO audit_logs (event, user_id, entity_type, entity_id, metadata)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(event.event)
        .bind(event.user_id)
        .bind(event.entity_type)
        .bind(event.entity_id.as_deref())
        .bind(event.metadata.as_ref().map(sqlx::types::Json))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
