pub mod address_repository;
pub mod audit_log_repository;
pub mod cart_repository;
pub mod category_repository;
pub mod order_repository;
pub mod payment_processor;
pub mod product_repository;
pub mod user_repository;

/// Result of a delete guarded by foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    InUse,
}
