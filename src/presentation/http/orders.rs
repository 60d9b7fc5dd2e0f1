use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::{self, Policy};
use crate::application::use_cases::orders::checkout::{Checkout, CheckoutRequest};
use crate::application::use_cases::orders::get_order::GetOrder;
use crate::application::use_cases::orders::list_orders::{ListAllOrders, ListOrders};
use crate::application::use_cases::orders::update_status::UpdateOrderStatus;
use crate::bootstrap::app_context::AppContext;
use crate::domain::orders::order::{Order, OrderItem, OrderStatus};
use crate::domain::payments::payment::Payment;
use crate::presentation::http::addresses::AddressDto;
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub id: Uuid,
    pub provider: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: Uuid,
    pub order_number: String,
    pub total_amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub shipping_address: Option<AddressDto>,
    pub items: Vec<OrderItemDto>,
    pub payment: Option<PaymentDto>,
}

impl From<OrderItem> for OrderItemDto {
    fn from(i: OrderItem) -> Self {
        Self {
            total_price: i.total_price(),
            id: i.id,
            product_id: i.product_id,
            product_name: i.product_name,
            quantity: i.quantity,
            unit_price: i.unit_price,
        }
    }
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            provider: p.provider,
            status: p.status.as_str().to_string(),
            transaction_id: p.transaction_id,
            payment_intent_id: p.payment_intent_id,
            amount: p.amount,
        }
    }
}

impl From<Order> for OrderDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            order_number: o.order_number,
            total_amount: o.total_amount,
            status: o.status.as_str().to_string(),
            created_at: o.created_at,
            shipping_address: o.shipping_address.map(Into::into),
            items: o.items.into_iter().map(Into::into).collect(),
            payment: o.payment.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub shipping_address_id: Uuid,
    #[serde(default)]
    pub payment_provider: Option<String>,
}

/// Status as sent by clients: the variant name or its numeric code.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StatusValue {
    Code(i64),
    Name(String),
}

impl StatusValue {
    pub fn resolve(&self) -> Result<OrderStatus, ApiError> {
        let status = match self {
            StatusValue::Code(code) => OrderStatus::from_code(*code),
            StatusValue::Name(name) => name.parse().ok(),
        };
        status.ok_or_else(|| ApiError::BadRequest("Invalid order status".into()))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusBody {
    pub status: StatusValue,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/checkout", post(checkout))
        .route("/orders/admin/all", get(list_all_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", patch(update_status))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/orders/checkout", tag = "Orders", request_body = CheckoutBody, responses(
    (status = 201, body = OrderDto),
    (status = 400, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn checkout(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(body): Json<CheckoutBody>,
) -> Result<(StatusCode, Json<OrderDto>), ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let orders = ctx.order_repo();
    let payments = ctx.payments();
    let audit = ctx.audit_repo();
    let uc = Checkout {
        orders: orders.as_ref(),
        payments: payments.as_ref(),
        audit: audit.as_ref(),
    };
    let req = CheckoutRequest {
        shipping_address_id: body.shipping_address_id,
        payment_provider: body.payment_provider,
    };
    let order = uc
        .execute(principal.user_id, &req, Utc::now())
        .await
        .inspect_err(|e| {
            tracing::info!(user_id = %principal.user_id, error = %e, "checkout_rejected");
        })?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

#[utoipa::path(get, path = "/api/orders", tag = "Orders", responses(
    (status = 200, body = [OrderDto])
))]
pub async fn list_orders(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.order_repo();
    let uc = ListOrders {
        repo: repo.as_ref(),
    };
    let items = uc.execute(principal.user_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/orders/{id}", tag = "Orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, body = OrderDto),
        (status = 404, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn get_order(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDto>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.order_repo();
    let uc = GetOrder {
        repo: repo.as_ref(),
    };
    let order = uc
        .execute(principal.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order with ID {id} not found")))?;
    Ok(Json(order.into()))
}

#[utoipa::path(get, path = "/api/orders/admin/all", tag = "Orders", responses(
    (status = 200, body = [OrderDto]),
    (status = 403, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn list_all_orders(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    access::require(&principal, Policy::AdminOnly)?;
    let repo = ctx.order_repo();
    let uc = ListAllOrders {
        repo: repo.as_ref(),
    };
    let items = uc.execute().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(patch, path = "/api/orders/{id}/status", tag = "Orders", request_body = UpdateStatusBody,
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, body = OrderDto),
        (status = 404, body = crate::presentation::http::error::ErrorBody),
        (status = 409, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn update_status(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<OrderDto>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    access::require(&principal, Policy::AdminOnly)?;
    let next = body.status.resolve()?;
    let repo = ctx.order_repo();
    let audit = ctx.audit_repo();
    let uc = UpdateOrderStatus {
        repo: repo.as_ref(),
        audit: audit.as_ref(),
    };
    let order = uc.execute(principal.user_id, id, next).await?;
    Ok(Json(order.into()))
}
