pub mod login;
pub mod me;
pub mod register;
pub mod request_password_reset;
pub mod reset_password;
pub mod sweep_reset_tokens;
