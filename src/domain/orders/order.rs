use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::addresses::address::Address;
use crate::domain::payments::payment::Payment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    PaymentReceived,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

const ALL_STATUSES: [OrderStatus; 7] = [
    OrderStatus::Pending,
    OrderStatus::PaymentReceived,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
    OrderStatus::Refunded,
];

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::PaymentReceived => "PaymentReceived",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        }
    }

    /// Numeric code, in declaration order starting at 0.
    pub fn code(&self) -> i64 {
        ALL_STATUSES
            .iter()
            .position(|s| s == self)
            .map(|p| p as i64)
            .unwrap_or_default()
    }

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| ALL_STATUSES.get(i).copied())
    }

    /// Position along the fulfilment chain; `None` for the terminal side states.
    fn stage(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::PaymentReceived => Some(1),
            OrderStatus::Processing => Some(2),
            OrderStatus::Shipped => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled | OrderStatus::Refunded => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }

    /// Checks whether an order may move from `self` to `next` and what the
    /// move implies for stock and payment.
    pub fn transition_to(&self, next: OrderStatus) -> Result<StatusChange, IllegalTransition> {
        let illegal = IllegalTransition {
            from: *self,
            to: next,
        };
        if *self == next {
            return Ok(StatusChange::unchanged(next));
        }
        if self.is_terminal() {
            return Err(illegal);
        }
        match next {
            OrderStatus::Cancelled => {
                if matches!(
                    self,
                    OrderStatus::Pending | OrderStatus::PaymentReceived | OrderStatus::Processing
                ) {
                    Ok(StatusChange {
                        from: *self,
                        to: next,
                        restock: true,
                        refund_payment: false,
                    })
                } else {
                    Err(illegal)
                }
            }
            OrderStatus::Refunded => {
                if *self == OrderStatus::Pending {
                    Err(illegal)
                } else {
                    Ok(StatusChange {
                        from: *self,
                        to: next,
                        restock: false,
                        refund_payment: true,
                    })
                }
            }
            _ => match (self.stage(), next.stage()) {
                (Some(cur), Some(nxt)) if nxt > cur => Ok(StatusChange {
                    from: *self,
                    to: next,
                    restock: false,
                    refund_payment: false,
                }),
                _ => Err(illegal),
            },
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL_STATUSES
            .iter()
            .copied()
            .find(|st| st.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("unknown order status: {wanted}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub restock: bool,
    pub refund_payment: bool,
}

impl StatusChange {
    fn unchanged(status: OrderStatus) -> Self {
        Self {
            from: status,
            to: status,
            restock: false,
            refund_payment: false,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("order cannot move from {from} to {to}")]
pub struct IllegalTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn total_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub shipping_address: Option<Address>,
    pub items: Vec<OrderItem>,
    pub payment: Option<Payment>,
}

/// `ORD-yyyyMMdd-XXXXXXXX`, the suffix being the first eight characters of
/// `nonce` in upper case.
pub fn generate_order_number(now: DateTime<Utc>, nonce: Uuid) -> String {
    let suffix = nonce.simple().to_string()[..8].to_ascii_uppercase();
    format!("ORD-{}-{}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn order_numbers_embed_date_and_nonce() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let nonce = Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap();
        assert_eq!(generate_order_number(now, nonce), "ORD-20240309-A1B2C3D4");
    }

    #[test]
    fn status_accepts_names_and_codes() {
        assert_eq!("paymentreceived".parse::<OrderStatus>().unwrap(), OrderStatus::PaymentReceived);
        assert_eq!(OrderStatus::from_code(3), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::from_code(7), None);
        assert_eq!(OrderStatus::from_code(-1), None);
        assert_eq!(OrderStatus::Refunded.code(), 6);
    }

    #[test]
    fn forward_moves_are_allowed() {
        let change = OrderStatus::Pending
            .transition_to(OrderStatus::Shipped)
            .unwrap();
        assert!(!change.restock && !change.refund_payment);
        assert!(OrderStatus::Shipped
            .transition_to(OrderStatus::Processing)
            .is_err());
    }

    #[test]
    fn cancellation_restocks_before_shipping_only() {
        assert!(OrderStatus::Processing
            .transition_to(OrderStatus::Cancelled)
            .unwrap()
            .restock);
        assert!(OrderStatus::Shipped
            .transition_to(OrderStatus::Cancelled)
            .is_err());
    }

    #[test]
    fn refunds_need_a_payment() {
        assert!(OrderStatus::Pending
            .transition_to(OrderStatus::Refunded)
            .is_err());
        assert!(OrderStatus::Delivered
            .transition_to(OrderStatus::Refunded)
            .unwrap()
            .refund_payment);
    }

    #[test]
    fn terminal_states_stay_put() {
        let err = OrderStatus::Cancelled
            .transition_to(OrderStatus::Processing)
            .unwrap_err();
        assert_eq!(err.to_string(), "order cannot move from Cancelled to Processing");
        assert!(OrderStatus::Refunded
            .transition_to(OrderStatus::Refunded)
            .unwrap()
            .is_noop());
    }
}
