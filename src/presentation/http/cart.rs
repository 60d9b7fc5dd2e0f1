use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::cart::add_item::AddCartItem;
use crate::application::use_cases::cart::clear_cart::ClearCart;
use crate::application::use_cases::cart::get_cart::GetCart;
use crate::application::use_cases::cart::remove_item::RemoveCartItem;
use crate::application::use_cases::cart::update_item::UpdateCartItem;
use crate::bootstrap::app_context::AppContext;
use crate::domain::carts::cart::{Cart, CartLine};
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub id: Uuid,
    pub items: Vec<CartItemDto>,
    pub total_amount: Decimal,
}

impl From<CartLine> for CartItemDto {
    fn from(l: CartLine) -> Self {
        Self {
            total_price: l.total_price(),
            id: l.id,
            product_id: l.product_id,
            product_name: l.product_name,
            quantity: l.quantity,
            unit_price: l.unit_price,
            image_url: l.image_url,
        }
    }
}

impl From<Cart> for CartDto {
    fn from(c: Cart) -> Self {
        Self {
            total_amount: c.total_amount(),
            id: c.id,
            items: c.lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemBody {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemBody {
    pub quantity: i32,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/:id", put(update_item).delete(remove_item))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/cart", tag = "Cart", responses(
    (status = 200, body = CartDto),
    (status = 401, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn get_cart(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<CartDto>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.cart_repo();
    let uc = GetCart {
        repo: repo.as_ref(),
    };
    let cart = uc.execute(principal.user_id).await?;
    Ok(Json(cart.into()))
}

#[utoipa::path(post, path = "/api/cart/items", tag = "Cart", request_body = AddCartItemBody, responses(
    (status = 200, body = CartDto),
    (status = 400, body = crate::presentation::http::error::ErrorBody),
    (status = 404, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn add_item(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(body): Json<AddCartItemBody>,
) -> Result<Json<CartDto>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let carts = ctx.cart_repo();
    let products = ctx.product_repo();
    let uc = AddCartItem {
        carts: carts.as_ref(),
        products: products.as_ref(),
    };
    let cart = uc
        .execute(principal.user_id, body.product_id, body.quantity)
        .await?;
    Ok(Json(cart.into()))
}

#[utoipa::path(put, path = "/api/cart/items/{id}", tag = "Cart", request_body = UpdateCartItemBody,
    params(("id" = Uuid, Path, description = "Cart item ID")),
    responses(
        (status = 200, body = CartDto),
        (status = 400, body = crate::presentation::http::error::ErrorBody),
        (status = 404, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn update_item(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCartItemBody>,
) -> Result<Json<CartDto>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let carts = ctx.cart_repo();
    let products = ctx.product_repo();
    let uc = UpdateCartItem {
        carts: carts.as_ref(),
        products: products.as_ref(),
    };
    let cart = uc.execute(principal.user_id, id, body.quantity).await?;
    Ok(Json(cart.into()))
}

#[utoipa::path(delete, path = "/api/cart/items/{id}", tag = "Cart",
    params(("id" = Uuid, Path, description = "Cart item ID")),
    responses((status = 204)))]
pub async fn remove_item(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.cart_repo();
    let uc = RemoveCartItem {
        repo: repo.as_ref(),
    };
    uc.execute(principal.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(delete, path = "/api/cart", tag = "Cart", responses((status = 204)))]
pub async fn clear_cart(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<StatusCode, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.cart_repo();
    let uc = ClearCart {
        repo: repo.as_ref(),
    };
    uc.execute(principal.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
