use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::DeleteOutcome;
use crate::domain::catalog::category::Category;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Category>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Category>>;
    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_category_id: Option<Uuid>,
    ) -> anyhow::Result<Category>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<DeleteOutcome>;
}
