use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::application::services::credentials;
use crate::domain::users::user::normalize_email;

#[derive(Debug, Clone)]
pub struct IssuedResetToken {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct RequestPasswordReset<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub ttl: Duration,
}

impl<'a, R: UserRepository + ?Sized> RequestPasswordReset<'a, R> {
    /// Returns `None` for unknown emails; callers must answer identically in
    /// both cases.
    pub async fn execute(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<IssuedResetToken>> {
        let Some(user) = self.repo.find_by_email(&normalize_email(email)).await? else {
            return Ok(None);
        };
        let token = credentials::generate_reset_token();
        let expires_at = now + self.ttl;
        self.repo
            .store_reset_token(user.id, &credentials::digest_token(&token), expires_at)
            .await?;
        Ok(Some(IssuedResetToken {
            user_id: user.id,
            token,
            expires_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeShop;
    use crate::domain::users::user::UserRole;

    #[tokio::test]
    async fn stores_only_the_digest() {
        let shop = FakeShop::default();
        let id = shop.add_user("customer@example.com", "Password123!", UserRole::Customer);
        let uc = RequestPasswordReset {
            repo: &shop,
            ttl: Duration::hours(24),
        };
        let now = Utc::now();
        let issued = uc
            .execute("customer@example.com", now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(issued.user_id, id);
        assert_eq!(issued.expires_at, now + Duration::hours(24));
        let (digest, _) = shop.reset_token_of(id).unwrap();
        assert_eq!(digest, credentials::digest_token(&issued.token));
        assert_ne!(digest, issued.token);
    }

    #[tokio::test]
    async fn unknown_email_issues_nothing() {
        let shop = FakeShop::default();
        let uc = RequestPasswordReset {
            repo: &shop,
            ttl: Duration::hours(24),
        };
        assert!(uc
            .execute("ghost@example.com", Utc::now())
            .await
            .unwrap()
            .is_none());
    }
}
