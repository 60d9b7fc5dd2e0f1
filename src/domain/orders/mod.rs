pub mod checkout;
pub mod order;
