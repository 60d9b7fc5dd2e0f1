use crate::application::errors::AuthError;
use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::application::ports::user_repository::{NewUser, UserRepository};
use crate::application::services::{audit, credentials};
use crate::domain::users::user::{User, UserRole, normalize_email};

const NAME_MAX: usize = 100;

pub struct Register<'a, R, A>
where
    R: UserRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub repo: &'a R,
    pub audit: &'a A,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

fn clean_name(field: &str, value: &str) -> Result<String, AuthError> {
    let v = value.trim();
    if v.is_empty() || v.chars().count() > NAME_MAX {
        return Err(AuthError::Validation(format!(
            "{field} must be between 1 and {NAME_MAX} characters"
        )));
    }
    Ok(v.to_string())
}

impl<'a, R, A> Register<'a, R, A>
where
    R: UserRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub async fn execute(&self, req: &RegisterRequest) -> Result<User, AuthError> {
        let email = normalize_email(&req.email);
        if !credentials::is_plausible_email(&email) {
            return Err(AuthError::Validation(
                "A valid email address is required".into(),
            ));
        }
        credentials::check_password_strength(&req.password).map_err(AuthError::Validation)?;
        let first_name = clean_name("firstName", &req.first_name)?;
        let last_name = clean_name("lastName", &req.last_name)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }
        let hash = credentials::hash_password(&req.password)?;
        let row = self
            .repo
            .create_user(&NewUser {
                email: &email,
                first_name: &first_name,
                last_name: &last_name,
                role: UserRole::Customer,
                password_hash: &hash,
            })
            .await?
            .ok_or(AuthError::EmailTaken)?;

        audit::record(
            self.audit,
            AuditEvent::new("user.registered")
                .by(row.id)
                .on("user", row.id),
        )
        .await;
        Ok(row.into())
    }
}
