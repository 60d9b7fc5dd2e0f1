pub mod address_repository_sqlx;
pub mod audit_log_repository_sqlx;
pub mod cart_repository_sqlx;
pub mod category_repository_sqlx;
pub mod order_repository_sqlx;
pub mod product_repository_sqlx;
pub mod user_repository_sqlx;
