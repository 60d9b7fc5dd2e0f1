pub mod checkout;
pub mod get_order;
pub mod list_orders;
pub mod update_status;
