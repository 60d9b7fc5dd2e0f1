use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::errors::{CheckoutError, OrderStatusError};
use crate::application::ports::order_repository::{CheckoutCommand, OrderRepository, PlacedOrder};
use crate::application::ports::payment_processor::PaymentProcessor;
use crate::domain::addresses::address::Address;
use crate::domain::orders::checkout::{CheckoutLine, CheckoutRejection, plan_checkout};
use crate::domain::orders::order::{Order, OrderItem, OrderStatus, StatusChange};
use crate::domain::payments::payment::{Payment, PaymentStatus};
use crate::infrastructure::db::PgPool;

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        CheckoutError::Storage(e.into())
    }
}

impl From<sqlx::Error> for OrderStatusError {
    fn from(e: sqlx::Error) -> Self {
        OrderStatusError::Storage(e.into())
    }
}

pub struct SqlxOrderRepository {
    pub pool: PgPool,
}

impl SqlxOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, rows: Vec<PgRow>) -> anyhow::Result<Vec<Order>> {
        let mut orders = rows
            .iter()
            .map(map_order)
            .collect::<anyhow::Result<Vec<Order>>>()?;
        if orders.is_empty() {
            return Ok(orders);
        }
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let item_rows = sqlx::query(
            r#"SELECT id, order_id, product_id, product_name, quantity, unit_price
               FROM order_items
               WHERE order_id = ANY($1)
               ORDER BY product_name, id"#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for r in item_rows {
            by_order.entry(r.get("order_id")).or_default().push(OrderItem {
                id: r.get("id"),
                product_id: r.get("product_id"),
                product_name: r.get("product_name"),
                quantity: r.get("quantity"),
                unit_price: r.get("unit_price"),
            });
        }
        for o in orders.iter_mut() {
            o.items = by_order.remove(&o.id).unwrap_or_default();
        }
        Ok(orders)
    }
}

const SELECT_ORDER: &str = r#"SELECT o.id, o.order_number, o.user_id, o.total_amount, o.status,
           o.created_at, o.updated_at,
           a.id AS a_id, a.user_id AS a_user_id, a.street, a.city, a.state, a.zip_code,
           a.country, a.is_default, a.created_at AS a_created_at,
           pay.id AS pay_id, pay.provider, pay.status AS pay_status, pay.transaction_id,
           pay.payment_intent_id, pay.amount AS pay_amount, pay.created_at AS pay_created_at
      FROM orders o
      LEFT JOIN addresses a ON a.id = o.shipping_address_id
      LEFT JOIN payments pay ON pay.order_id = o.id"#;

fn map_order(r: &PgRow) -> anyhow::Result<Order> {
    let status: String = r.get("status");
    let shipping_address = r
        .get::<Option<Uuid>, _>("a_id")
        .map(|id| Address {
            id,
            user_id: r.get("a_user_id"),
            street: r.get("street"),
            city: r.get("city"),
            state: r.get("state"),
            zip_code: r.get("zip_code"),
            country: r.get("country"),
            is_default: r.get("is_default"),
            created_at: r.get("a_created_at"),
        });
    let payment = match r.get::<Option<Uuid>, _>("pay_id") {
        Some(id) => {
            let pay_status: String = r.get("pay_status");
            Some(Payment {
                id,
                order_id: r.get("id"),
                provider: r.get("provider"),
                status: pay_status.parse()?,
                transaction_id: r.get("transaction_id"),
                payment_intent_id: r.get("payment_intent_id"),
                amount: r.get("pay_amount"),
                created_at: r.get("pay_created_at"),
            })
        }
        None => None,
    };
    Ok(Order {
        id: r.get("id"),
        order_number: r.get("order_number"),
        user_id: r.get("user_id"),
        total_amount: r.get("total_amount"),
        status: status.parse()?,
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
        shipping_address,
        items: Vec::new(),
        payment,
    })
}

#[async_trait]
impl OrderRepository for SqlxOrderRepository {
    async fn checkout(
        &self,
        cmd: &CheckoutCommand,
        payments: &dyn PaymentProcessor,
    ) -> Result<PlacedOrder, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM carts WHERE user_id = $1 FOR UPDATE")
                .bind(cmd.user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(cart_id) = cart_id else {
            return Err(CheckoutRejection::EmptyCart.into());
        };
        // Products are locked in id order so concurrent checkouts cannot deadlock.
        let line_rows = sqlx::query(
            r#"SELECT ci.product_id, p.name, ci.quantity, ci.unit_price,
                      p.stock_quantity, p.is_active
               FROM cart_items ci
               JOIN products p ON p.id = ci.product_id
               WHERE ci.cart_id = $1
               ORDER BY p.id
               FOR UPDATE OF ci, p"#,
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;
        if line_rows.is_empty() {
            return Err(CheckoutRejection::EmptyCart.into());
        }
        let lines: Vec<CheckoutLine> = line_rows
            .iter()
            .map(|r| CheckoutLine {
                product_id: r.get("product_id"),
                product_name: r.get("name"),
                quantity: r.get("quantity"),
                unit_price: r.get("unit_price"),
                stock_quantity: r.get("stock_quantity"),
                is_active: r.get("is_active"),
            })
            .collect();

        let owns_address: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM addresses WHERE id = $1 AND user_id = $2)",
        )
        .bind(cmd.shipping_address_id)
        .bind(cmd.user_id)
        .fetch_one(&mut *tx)
        .await?;
        if !owns_address {
            return Err(CheckoutError::UnknownAddress);
        }

        let plan = plan_checkout(&lines)?;

        let order_id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO orders (order_number, user_id, shipping_address_id, total_amount, status)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(&cmd.order_number)
        .bind(cmd.user_id)
        .bind(cmd.shipping_address_id)
        .bind(plan.total_amount)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await?;

        for (item, line) in plan.items.iter().zip(&lines) {
            sqlx::query(
                r#"INSERT INTO order_items (order_id, product_id, product_name, quantity, unit_price)
                   VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&line.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
            sqlx::query(
                r#"UPDATE products
                   SET stock_quantity = stock_quantity - $2, updated_at = now()
                   WHERE id = $1"#,
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        let attempt = payments
            .process(order_id, plan.total_amount, &cmd.payment_provider)
            .await?;
        sqlx::query(
            r#"INSERT INTO payments (order_id, provider, status, transaction_id, payment_intent_id, amount)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(order_id)
        .bind(attempt.provider.as_str())
        .bind(attempt.status.as_str())
        .bind(attempt.transaction_id.as_deref())
        .bind(attempt.payment_intent_id.as_deref())
        .bind(attempt.amount)
        .execute(&mut *tx)
        .await?;

        let status = if attempt.status == PaymentStatus::Completed {
            sqlx::query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
                .bind(order_id)
                .bind(OrderStatus::PaymentReceived.as_str())
                .execute(&mut *tx)
                .await?;
            OrderStatus::PaymentReceived
        } else {
            OrderStatus::Pending
        };

        tx.commit().await?;
        Ok(PlacedOrder { order_id, status })
    }

    async fn get_for_user(&self, order_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Order>> {
        let rows = sqlx::query(&format!(
            "{SELECT_ORDER} WHERE o.id = $1 AND o.user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(self.hydrate(rows).await?.into_iter().next())
    }

    async fn get(&self, order_id: Uuid) -> anyhow::Result<Option<Order>> {
        let rows = sqlx::query(&format!("{SELECT_ORDER} WHERE o.id = $1"))
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(self.hydrate(rows).await?.into_iter().next())
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "{SELECT_ORDER} WHERE o.user_id = $1 ORDER BY o.created_at DESC, o.id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        self.hydrate(rows).await
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Order>> {
        let rows = sqlx::query(&format!("{SELECT_ORDER} ORDER BY o.created_at DESC, o.id"))
            .fetch_all(&self.pool)
            .await?;
        self.hydrate(rows).await
    }

    async fn change_status(
        &self,
        order_id: Uuid,
        next: OrderStatus,
    ) -> Result<StatusChange, OrderStatusError> {
        let mut tx = self.pool.begin().await?;
        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;
        let current: OrderStatus = current
            .ok_or(OrderStatusError::NotFound(order_id))?
            .parse()?;
        let change = current.transition_to(next)?;
        if change.is_noop() {
            return Ok(change);
        }

        if change.restock {
            sqlx::query(
                r#"UPDATE products p
                   SET stock_quantity = p.stock_quantity + oi.qty, updated_at = now()
                   FROM (SELECT product_id, SUM(quantity)::int AS qty
                           FROM order_items WHERE order_id = $1
                          GROUP BY product_id) oi
                   WHERE p.id = oi.product_id"#,
            )
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        }
        if change.refund_payment {
            sqlx::query("UPDATE payments SET status = $2, updated_at = now() WHERE order_id = $1")
                .bind(order_id)
                .bind(PaymentStatus::Refunded.as_str())
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
            .bind(order_id)
            .bind(change.to.as_str())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(change)
    }
}
