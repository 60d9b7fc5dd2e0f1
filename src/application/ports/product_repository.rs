use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::DeleteOutcome;
use crate::domain::catalog::product::{Page, Product, ProductFields, ProductQuery};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, query: &ProductQuery) -> anyhow::Result<Page<Product>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Product>>;
    /// Returns `None` when the SKU is already taken.
    async fn create(&self, sku: &str, fields: &ProductFields) -> anyhow::Result<Option<Uuid>>;
    /// Returns `false` when the product does not exist.
    async fn update(&self, id: Uuid, fields: &ProductFields, is_active: bool)
    -> anyhow::Result<bool>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<DeleteOutcome>;
}
