use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Processing => "Processing",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Refunded => "Refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Pending" => PaymentStatus::Pending,
            "Processing" => PaymentStatus::Processing,
            "Completed" => PaymentStatus::Completed,
            "Failed" => PaymentStatus::Failed,
            "Refunded" => PaymentStatus::Refunded,
            other => anyhow::bail!("unknown payment status: {other}"),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentProvider {
    Mock,
    Stripe,
    PayPal,
}

impl PaymentProvider {
    /// Case-insensitive lookup; `None` for providers we do not support.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mock" => Some(PaymentProvider::Mock),
            "stripe" => Some(PaymentProvider::Stripe),
            "paypal" => Some(PaymentProvider::PayPal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Mock => "Mock",
            PaymentProvider::Stripe => "Stripe",
            PaymentProvider::PayPal => "PayPal",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub provider: String,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub amount: Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Result of handing an order to a payment provider, before it is stored.
#[derive(Debug, Clone)]
pub struct PaymentAttempt {
    pub provider: PaymentProvider,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub amount: Decimal,
}
