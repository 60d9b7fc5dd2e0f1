use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event: &'static str,
    pub user_id: Option<Uuid>,
    pub entity_type: Option<&'static str>,
    pub entity_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(event: &'static str) -> Self {
        Self {
            event,
            user_id: None,
            entity_type: None,
            entity_id: None,
            metadata: None,
        }
    }

    pub fn by(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn on(mut self, entity_type: &'static str, entity_id: impl ToString) -> Self {
        self.entity_type = Some(entity_type);
        self.entity_id = Some(entity_id.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn record(&self, event: &AuditEvent) -> anyhow::Result<()>;
}
