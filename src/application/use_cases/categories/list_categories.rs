use crate::application::ports::category_repository::CategoryRepository;
use crate::domain::catalog::category::Category;

pub struct ListCategories<'a, R: CategoryRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CategoryRepository + ?Sized> ListCategories<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<Category>> {
        self.repo.list().await
    }
}
