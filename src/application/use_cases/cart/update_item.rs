use uuid::Uuid;

use crate::application::errors::CartError;
use crate::application::ports::cart_repository::CartRepository;
use crate::application::ports::product_repository::ProductRepository;
use crate::domain::carts::cart::Cart;

pub struct UpdateCartItem<'a, C, P>
where
    C: CartRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    pub carts: &'a C,
    pub products: &'a P,
}

impl<'a, C, P> UpdateCartItem<'a, C, P>
where
    C: CartRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    /// A quantity of zero or less removes the line.
    pub async fn execute(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        let cart_id = self.carts.get_or_create(user_id).await?;
        let cart = self.carts.load(cart_id).await?;
        let line = cart.line(line_id).ok_or(CartError::LineNotFound(line_id))?;

        if quantity <= 0 {
            self.carts.remove_line(cart_id, line_id).await?;
        } else {
            let product = self
                .products
                .get(line.product_id)
                .await?
                .ok_or(CartError::ProductNotFound(line.product_id))?;
            if quantity > product.stock_quantity {
                return Err(CartError::InsufficientStock);
            }
            self.carts
                .update_line(cart_id, line_id, quantity, None)
                .await?;
        }
        Ok(self.carts.load(cart_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeShop;
    use crate::application::use_cases::cart::add_item::AddCartItem;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn sets_quantity_and_removes_at_zero() {
        let shop = FakeShop::default();
        let cat = shop.add_category("Clothing");
        let shirt = shop.add_product("Cotton T-Shirt", "CLO-TSH-001", dec!(19.99), 10, cat);
        let user = Uuid::new_v4();
        let cart = AddCartItem {
            carts: &shop,
            products: &shop,
        }
        .execute(user, shirt, 1)
        .await
        .unwrap();
        let line_id = cart.lines[0].id;

        let uc = UpdateCartItem {
            carts: &shop,
            products: &shop,
        };
        let cart = uc.execute(user, line_id, 4).await.unwrap();
        assert_eq!(cart.lines[0].quantity, 4);
        assert_eq!(cart.total_amount(), dec!(79.96));

        assert!(matches!(
            uc.execute(user, line_id, 11).await,
            Err(CartError::InsufficientStock)
        ));

        let cart = uc.execute(user, line_id, 0).await.unwrap();
        assert!(cart.lines.is_empty());
        assert!(matches!(
            uc.execute(user, line_id, 1).await,
            Err(CartError::LineNotFound(_))
        ));
    }

    #[tokio::test]
    async fn other_users_lines_are_invisible() {
        let shop = FakeShop::default();
        let cat = shop.add_category("Clothing");
        let shirt = shop.add_product("Cotton T-Shirt", "CLO-TSH-001", dec!(19.99), 10, cat);
        let owner = Uuid::new_v4();
        let cart = AddCartItem {
            carts: &shop,
            products: &shop,
        }
        .execute(owner, shirt, 1)
        .await
        .unwrap();

        let uc = UpdateCartItem {
            carts: &shop,
            products: &shop,
        };
        assert!(matches!(
            uc.execute(Uuid::new_v4(), cart.lines[0].id, 2).await,
            Err(CartError::LineNotFound(_))
        ));
    }
}
