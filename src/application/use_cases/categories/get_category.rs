use uuid::Uuid;

use crate::application::ports::category_repository::CategoryRepository;
use crate::domain::catalog::category::Category;

pub struct GetCategory<'a, R: CategoryRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CategoryRepository + ?Sized> GetCategory<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        self.repo.get(id).await
    }
}
