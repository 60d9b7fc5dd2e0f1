//! Business-rule failures raised by the use cases.
//!
//! Each enum carries a `Storage` variant for infrastructure errors so the
//! adapters can bubble database failures through the same channel.

use crate::domain::orders::checkout::CheckoutRejection;
use crate::domain::orders::order::IllegalTransition;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("User with this email already exists")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid or expired reset token")]
    InvalidResetToken,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),
    #[error("Category not found")]
    CategoryNotFound,
    #[error("Product not found")]
    ProductNotFound,
    #[error("A product with SKU '{0}' already exists")]
    DuplicateSku(String),
    #[error("Category still has products or subcategories")]
    CategoryInUse,
    #[error("Product is referenced by existing orders")]
    ProductInUse,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum CartError {
    #[error("{0}")]
    Validation(String),
    #[error("Product with ID {0} not found")]
    ProductNotFound(uuid::Uuid),
    #[error("Cart item with ID {0} not found")]
    LineNotFound(uuid::Uuid),
    #[error("Product is not available")]
    ProductUnavailable,
    #[error("Insufficient stock")]
    InsufficientStock,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum AddressError {
    #[error("Invalid address field: {0}")]
    Validation(String),
    #[error("Address not found")]
    NotFound,
    #[error("Address is used by existing orders")]
    InUse,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Payment provider '{0}' is not supported")]
    UnsupportedProvider(String),
}

#[derive(thiserror::Error, Debug)]
pub enum CheckoutError {
    #[error(transparent)]
    Rejected(#[from] CheckoutRejection),
    #[error("Shipping address not found")]
    UnknownAddress,
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum OrderStatusError {
    #[error("Order with ID {0} not found")]
    NotFound(uuid::Uuid),
    #[error(transparent)]
    Illegal(#[from] IllegalTransition),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
