pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod orders;
pub mod payments;
pub mod users;
