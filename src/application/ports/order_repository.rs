use async_trait::async_trait;
use uuid::Uuid;

use crate::application::errors::{CheckoutError, OrderStatusError};
use crate::application::ports::payment_processor::PaymentProcessor;
use crate::domain::orders::order::{Order, OrderStatus, StatusChange};

#[derive(Debug, Clone)]
pub struct CheckoutCommand {
    pub user_id: Uuid,
    pub shipping_address_id: Uuid,
    pub payment_provider: String,
    pub order_number: String,
}

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub status: OrderStatus,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Turns the user's cart into an order in a single transaction: locks the
    /// cart lines and their products, validates stock, writes the order and
    /// its items, decrements stock, empties the cart and records the payment.
    /// Any failure rolls the whole thing back.
    async fn checkout(
        &self,
        cmd: &CheckoutCommand,
        payments: &dyn PaymentProcessor,
    ) -> Result<PlacedOrder, CheckoutError>;

    async fn get_for_user(&self, order_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Order>>;
    async fn get(&self, order_id: Uuid) -> anyhow::Result<Option<Order>>;
    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Order>>;
    /// Newest first.
    async fn list_all(&self) -> anyhow::Result<Vec<Order>>;

    /// Applies a status change under a row lock, restocking items on
    /// cancellation and refunding the payment on refund.
    async fn change_status(
        &self,
        order_id: Uuid,
        next: OrderStatus,
    ) -> Result<StatusChange, OrderStatusError>;
}
