use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::errors::PaymentError;
use crate::application::ports::payment_processor::PaymentProcessor;
use crate::domain::payments::payment::{PaymentAttempt, PaymentProvider, PaymentStatus};

/// Stand-in for real gateways. Mock payments settle immediately; Stripe and
/// PayPal attempts stay pending as if waiting on a webhook.
#[derive(Debug, Default, Clone)]
pub struct MockPaymentProcessor;

impl MockPaymentProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn process(
        &self,
        order_id: Uuid,
        amount: Decimal,
        provider: &str,
    ) -> Result<PaymentAttempt, PaymentError> {
        let provider = PaymentProvider::parse(provider)
            .ok_or_else(|| PaymentError::UnsupportedProvider(provider.to_string()))?;
        let attempt = match provider {
            PaymentProvider::Mock => {
                let id = Uuid::new_v4().to_string();
                PaymentAttempt {
                    provider,
                    status: PaymentStatus::Completed,
                    transaction_id: Some(format!("MOCK-{}", id[..12].to_ascii_uppercase())),
                    payment_intent_id: None,
                    amount,
                }
            }
            PaymentProvider::Stripe => PaymentAttempt {
                provider,
                status: PaymentStatus::Pending,
                transaction_id: None,
                payment_intent_id: Some(format!("pi_{}", Uuid::new_v4().simple())),
                amount,
            },
            PaymentProvider::PayPal => PaymentAttempt {
                provider,
                status: PaymentStatus::Pending,
                transaction_id: None,
                payment_intent_id: None,
                amount,
            },
        };
        tracing::debug!(
            order_id = %order_id,
            provider = provider.as_str(),
            status = %attempt.status,
            "payment_processed"
        );
        Ok(attempt)
    }
}
