use uuid::Uuid;

use crate::application::ports::cart_repository::CartRepository;
use crate::domain::carts::cart::Cart;

pub struct GetCart<'a, R: CartRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CartRepository + ?Sized> GetCart<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<Cart> {
        let cart_id = self.repo.get_or_create(user_id).await?;
        self.repo.load(cart_id).await
    }
}
