use uuid::Uuid;

use crate::application::ports::cart_repository::CartRepository;

pub struct RemoveCartItem<'a, R: CartRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: CartRepository + ?Sized> RemoveCartItem<'a, R> {
    /// Removing a line that is not in the cart is not an error.
    pub async fn execute(&self, user_id: Uuid, line_id: Uuid) -> anyhow::Result<()> {
        let cart_id = self.repo.get_or_create(user_id).await?;
        self.repo.remove_line(cart_id, line_id).await?;
        Ok(())
    }
}
