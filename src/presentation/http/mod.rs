pub mod addresses;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod error;
pub mod health;
pub mod orders;
pub mod products;
