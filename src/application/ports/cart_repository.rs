use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::carts::cart::Cart;

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Returns the user's cart id, creating the cart on first access.
    async fn get_or_create(&self, user_id: Uuid) -> anyhow::Result<Uuid>;
    async fn load(&self, cart_id: Uuid) -> anyhow::Result<Cart>;
    /// Adds a line, merging into an existing line for the same product.
    /// Returns `None` when the merged quantity would exceed the product stock.
    async fn insert_line(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> anyhow::Result<Option<Uuid>>;
    // unit_price: None keeps the captured price
    async fn update_line(
        &self,
        cart_id: Uuid,
        line_id: Uuid,
        quantity: i32,
        unit_price: Option<Decimal>,
    ) -> anyhow::Result<bool>;
    async fn remove_line(&self, cart_id: Uuid, line_id: Uuid) -> anyhow::Result<bool>;
    async fn clear(&self, cart_id: Uuid) -> anyhow::Result<u64>;
}
