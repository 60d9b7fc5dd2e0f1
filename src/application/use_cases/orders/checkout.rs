use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::application::errors::{CheckoutError, PaymentError};
use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::application::ports::order_repository::{CheckoutCommand, OrderRepository};
use crate::application::ports::payment_processor::PaymentProcessor;
use crate::application::services::audit;
use crate::domain::orders::order::{Order, generate_order_number};
use crate::domain::payments::payment::PaymentProvider;

pub const DEFAULT_PAYMENT_PROVIDER: &str = "Mock";

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub shipping_address_id: Uuid,
    pub payment_provider: Option<String>,
}

pub struct Checkout<'a, O, A>
where
    O: OrderRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub orders: &'a O,
    pub payments: &'a dyn PaymentProcessor,
    pub audit: &'a A,
}

impl<'a, O, A> Checkout<'a, O, A>
where
    O: OrderRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        req: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> Result<Order, CheckoutError> {
        let requested = req
            .payment_provider
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PAYMENT_PROVIDER);
        let provider = PaymentProvider::parse(requested)
            .ok_or_else(|| PaymentError::UnsupportedProvider(requested.to_string()))?;

        let cmd = CheckoutCommand {
            user_id,
            shipping_address_id: req.shipping_address_id,
            payment_provider: provider.as_str().to_string(),
            order_number: generate_order_number(now, Uuid::new_v4()),
        };
        let placed = self.orders.checkout(&cmd, self.payments).await?;
        tracing::info!(
            order_id = %placed.order_id,
            order_number = %cmd.order_number,
            user_id = %user_id,
            status = %placed.status,
            "order_placed"
        );
        audit::record(
            self.audit,
            AuditEvent::new("order.created")
                .by(user_id)
                .on("order", placed.order_id)
                .with_metadata(json!({
                    "orderNumber": cmd.order_number,
                    "paymentProvider": cmd.payment_provider,
                    "status": placed.status.as_str(),
                })),
        )
        .await;

        self.orders
            .get_for_user(placed.order_id, user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("order {} missing after checkout", placed.order_id).into())
    }
}
