use chrono::{DateTime, Utc};

use crate::application::ports::user_repository::UserRepository;

pub struct SweepResetTokens<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> SweepResetTokens<'a, R> {
    pub async fn execute(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let cleared = self.repo.clear_expired_reset_tokens(now).await?;
        if cleared > 0 {
            tracing::info!(cleared, "expired_reset_tokens_cleared");
        }
        Ok(cleared)
    }
}
