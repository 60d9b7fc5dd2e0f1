use serde_json::json;
use uuid::Uuid;

use crate::application::errors::OrderStatusError;
use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::application::ports::order_repository::OrderRepository;
use crate::application::services::audit;
use crate::domain::orders::order::{Order, OrderStatus};

pub struct UpdateOrderStatus<'a, R, A>
where
    R: OrderRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub repo: &'a R,
    pub audit: &'a A,
}

impl<'a, R, A> UpdateOrderStatus<'a, R, A>
where
    R: OrderRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub async fn execute(
        &self,
        actor: Uuid,
        order_id: Uuid,
        next: OrderStatus,
    ) -> Result<Order, OrderStatusError> {
        let change = self.repo.change_status(order_id, next).await?;
        if !change.is_noop() {
            tracing::info!(
                order_id = %order_id,
                from = %change.from,
                to = %change.to,
                restocked = change.restock,
                refunded = change.refund_payment,
                "order_status_changed"
            );
            audit::record(
                self.audit,
                AuditEvent::new("order.status_changed")
                    .by(actor)
                    .on("order", order_id)
                    .with_metadata(json!({
                        "from": change.from.as_str(),
                        "to": change.to.as_str(),
                    })),
            )
            .await;
        }
        self.repo
            .get(order_id)
            .await?
            .ok_or(OrderStatusError::NotFound(order_id))
    }
}
