pub mod create_address;
pub mod delete_address;
pub mod list_addresses;
