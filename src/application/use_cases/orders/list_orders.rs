use uuid::Uuid;

use crate::application::ports::order_repository::OrderRepository;
use crate::domain::orders::order::Order;

pub struct ListOrders<'a, R: OrderRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: OrderRepository + ?Sized> ListOrders<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<Vec<Order>> {
        self.repo.list_for_user(user_id).await
    }
}

pub struct ListAllOrders<'a, R: OrderRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: OrderRepository + ?Sized> ListAllOrders<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<Order>> {
        self.repo.list_all().await
    }
}
