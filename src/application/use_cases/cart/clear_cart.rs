use uuid::Uuid;

use crate::application::ports::cart_repository::CartRepository;

pub struct ClearCart<'a, R: CartRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CartRepository + ?Sized> ClearCart<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let cart_id = self.repo.get_or_create(user_id).await?;
        self.repo.clear(cart_id).await
    }
}
