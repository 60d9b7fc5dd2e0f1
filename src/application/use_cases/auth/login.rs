use crate::application::errors::AuthError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::credentials;
use crate::domain::users::user::{User, normalize_email};

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> Result<User, AuthError> {
        let row = self
            .repo
            .find_by_email(&normalize_email(&req.email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let hash = row.password_hash.clone().unwrap_or_default();
        if credentials::verify_password(&req.password, &hash) {
            Ok(row.into())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
