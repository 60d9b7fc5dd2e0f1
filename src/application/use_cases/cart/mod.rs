pub mod add_item;
pub mod clear_cart;
pub mod get_cart;
pub mod remove_item;
pub mod update_item;
