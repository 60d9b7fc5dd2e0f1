use uuid::Uuid;

use crate::application::ports::order_repository::OrderRepository;
use crate::domain::orders::order::Order;

pub struct GetOrder<'a, R: OrderRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: OrderRepository + ?Sized> GetOrder<'a, R> {
    /// Orders of other users are reported as missing.
    pub async fn execute(&self, user_id: Uuid, order_id: Uuid) -> anyhow::Result<Option<Order>> {
        self.repo.get_for_user(order_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeShop;
    use crate::domain::users::user::UserRole;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn owners_only() {
        let shop = FakeShop::default();
        let cat = shop.add_category("Books");
        let book = shop.add_product("Programming Guide", "BOOK-PRG-001", dec!(49.99), 75, cat);
        let owner = shop.add_user("customer@example.com", "Password123!", UserRole::Customer);
        let order = shop.place_order(owner, &[(book, 2)]).await;

        let uc = GetOrder { repo: &shop };
        let found = uc.execute(owner, order.id).await.unwrap().unwrap();
        assert_eq!(found.items[0].total_price(), dec!(99.98));
        assert!(uc.execute(Uuid::new_v4(), order.id).await.unwrap().is_none());
    }
}
