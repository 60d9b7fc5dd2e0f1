use uuid::Uuid;

use crate::application::errors::CartError;
use crate::application::ports::cart_repository::CartRepository;
use crate::application::ports::product_repository::ProductRepository;
use crate::domain::carts::cart::Cart;

pub struct AddCartItem<'a, C, P>
where
    C: CartRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    pub carts: &'a C,
    pub products: &'a P,
}

impl<'a, C, P> AddCartItem<'a, C, P>
where
    C: CartRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    /// Adding a product that is already in the cart accumulates the quantity
    /// and refreshes the captured unit price.
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        if quantity < 1 {
            return Err(CartError::Validation("Quantity must be at least 1".into()));
        }
        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;
        if !product.is_active {
            return Err(CartError::ProductUnavailable);
        }

        let cart_id = self.carts.get_or_create(user_id).await?;
        let cart = self.carts.load(cart_id).await?;
        match cart.line_for_product(product_id) {
            Some(line) => {
                let total = line.quantity.saturating_add(quantity);
                if total > product.stock_quantity {
                    return Err(CartError::InsufficientStock);
                }
                self.carts
                    .update_line(cart_id, line.id, total, Some(product.price))
                    .await?;
            }
            None => {
                if quantity > product.stock_quantity {
                    return Err(CartError::InsufficientStock);
                }
                self.carts
                    .insert_line(cart_id, product_id, quantity, product.price)
                    .await?
                    .ok_or(CartError::InsufficientStock)?;
            }
        }
        Ok(self.carts.load(cart_id).await?)
    }
}
