use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::errors::PaymentError;
use crate::domain::payments::payment::PaymentAttempt;

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn process(
        &self,
        order_id: Uuid,
        amount: Decimal,
        provider: &str,
    ) -> Result<PaymentAttempt, PaymentError>;
}
