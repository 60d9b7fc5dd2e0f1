use chrono::{DateTime, Utc};

use crate::application::errors::AuthError;
use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::{audit, credentials};

pub struct ResetPassword<'a, R, A>
where
    R: UserRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub repo: &'a R,
    pub audit: &'a A,
}

impl<'a, R, A> ResetPassword<'a, R, A>
where
    R: UserRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub async fn execute(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidResetToken);
        }
        credentials::check_password_strength(new_password).map_err(AuthError::Validation)?;
        let user = self
            .repo
            .find_by_reset_token(&credentials::digest_token(token), now)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;
        let hash = credentials::hash_password(new_password)?;
        if !self.repo.update_password(user.id, &hash).await? {
            return Err(AuthError::InvalidResetToken);
        }
        audit::record(
            self.audit,
            AuditEvent::new("user.password_reset")
                .by(user.id)
                .on("user", user.id),
        )
        .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeShop;
    use crate::application::use_cases::auth::login::{Login, LoginRequest};
    use crate::application::use_cases::auth::request_password_reset::RequestPasswordReset;
    use crate::domain::users::user::UserRole;
    use chrono::Duration;

    #[tokio::test]
    async fn valid_token_replaces_password_once() {
        let shop = FakeShop::default();
        let id = shop.add_user("customer@example.com", "Password123!", UserRole::Customer);
        let now = Utc::now();
        let issued = RequestPasswordReset {
            repo: &shop,
            ttl: Duration::hours(24),
        }
        .execute("customer@example.com", now)
        .await
        .unwrap()
        .unwrap();

        let uc = ResetPassword {
            repo: &shop,
            audit: &shop,
        };
        uc.execute(&issued.token, "BrandNewPass1", now).await.unwrap();
        assert!(shop.reset_token_of(id).is_none());

        let login = Login { repo: &shop };
        assert!(login
            .execute(&LoginRequest {
                email: "customer@example.com".into(),
                password: "BrandNewPass1".into(),
            })
            .await
            .is_ok());

        let again = uc.execute(&issued.token, "AnotherPass1", now).await;
        assert!(matches!(again, Err(AuthError::InvalidResetToken)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let shop = FakeShop::default();
        shop.add_user("customer@example.com", "Password123!", UserRole::Customer);
        let issued_at = Utc::now() - Duration::hours(25);
        let issued = RequestPasswordReset {
            repo: &shop,
            ttl: Duration::hours(24),
        }
        .execute("customer@example.com", issued_at)
        .await
        .unwrap()
        .unwrap();

        let uc = ResetPassword {
            repo: &shop,
            audit: &shop,
        };
        let err = uc
            .execute(&issued.token, "BrandNewPass1", Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid or expired reset token");
    }
}
