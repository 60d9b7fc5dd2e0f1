use uuid::Uuid;

use crate::application::ports::product_repository::ProductRepository;
use crate::domain::catalog::product::Product;

pub struct GetProduct<'a, R: ProductRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ProductRepository + ?Sized> GetProduct<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        self.repo.get(id).await
    }
}
