use rust_decimal::Decimal;
use uuid::Uuid;

/// A cart line joined with the locked state of its product.
#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub stock_quantity: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub items: Vec<PlannedItem>,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutRejection {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Insufficient stock for product: {0}")]
    InsufficientStock(String),
    #[error("Product is no longer available: {0}")]
    Unavailable(String),
}

/// Validates the cart against current stock and prices the order from the
/// unit prices captured in the cart.
pub fn plan_checkout(lines: &[CheckoutLine]) -> Result<CheckoutPlan, CheckoutRejection> {
    if lines.is_empty() {
        return Err(CheckoutRejection::EmptyCart);
    }
    for line in lines {
        if !line.is_active {
            return Err(CheckoutRejection::Unavailable(line.product_name.clone()));
        }
        if line.stock_quantity < line.quantity {
            return Err(CheckoutRejection::InsufficientStock(
                line.product_name.clone(),
            ));
        }
    }
    let items: Vec<PlannedItem> = lines
        .iter()
        .map(|l| PlannedItem {
            product_id: l.product_id,
            quantity: l.quantity,
            unit_price: l.unit_price,
        })
        .collect();
    let total_amount = items
        .iter()
        .map(|i| i.unit_price * Decimal::from(i.quantity))
        .sum();
    Ok(CheckoutPlan {
        items,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(name: &str, qty: i32, price: Decimal, stock: i32) -> CheckoutLine {
        CheckoutLine {
            product_id: Uuid::new_v4(),
            product_name: name.into(),
            quantity: qty,
            unit_price: price,
            stock_quantity: stock,
            is_active: true,
        }
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert_eq!(plan_checkout(&[]), Err(CheckoutRejection::EmptyCart));
    }

    #[test]
    fn totals_use_cart_prices() {
        let plan = plan_checkout(&[
            line("Laptop Pro 15", 1, dec!(1299.99), 50),
            line("Wireless Mouse", 3, dec!(29.99), 3),
        ])
        .unwrap();
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.total_amount, dec!(1389.96));
    }

    #[test]
    fn short_stock_names_the_product() {
        let err = plan_checkout(&[
            line("Wireless Mouse", 1, dec!(29.99), 10),
            line("Cotton T-Shirt", 5, dec!(19.99), 4),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product: Cotton T-Shirt"
        );
    }

    #[test]
    fn inactive_products_block_checkout() {
        let mut l = line("Programming Guide", 1, dec!(49.99), 75);
        l.is_active = false;
        assert_eq!(
            plan_checkout(&[l]),
            Err(CheckoutRejection::Unavailable("Programming Guide".into()))
        );
    }
}
