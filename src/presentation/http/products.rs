use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::{self, Policy};
use crate::application::use_cases::products::create_product::{
    CreateProduct, CreateProductRequest,
};
use crate::application::use_cases::products::delete_product::DeleteProduct;
use crate::application::use_cases::products::get_product::GetProduct;
use crate::application::use_cases::products::list_products::ListProducts;
use crate::application::use_cases::products::update_product::{
    UpdateProduct, UpdateProductRequest,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::catalog::product::{Page, Product, ProductImage, ProductQuery};
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageDto {
    pub id: Uuid,
    pub url: String,
    pub alt_text: String,
    pub display_order: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Uuid,
    pub category_name: String,
    pub is_active: bool,
    pub images: Vec<ProductImageDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedProductsDto {
    pub items: Vec<ProductDto>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl From<ProductImage> for ProductImageDto {
    fn from(i: ProductImage) -> Self {
        Self {
            id: i.id,
            url: i.url,
            alt_text: i.alt_text,
            display_order: i.display_order,
        }
    }
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            sku: p.sku,
            description: p.description,
            price: p.price,
            stock_quantity: p.stock_quantity,
            category_id: p.category_id,
            category_name: p.category_name,
            is_active: p.is_active,
            images: p.images.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Page<Product>> for PagedProductsDto {
    fn from(page: Page<Product>) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total_count: page.total_count,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
}

impl ProductListQuery {
    fn into_query(self) -> Result<ProductQuery, ApiError> {
        let min_price = parse_price("minPrice", self.min_price.as_deref())?;
        let max_price = parse_price("maxPrice", self.max_price.as_deref())?;
        Ok(ProductQuery::new(
            self.search,
            self.category_id,
            min_price,
            max_price,
            self.page,
            self.page_size,
            self.sort_by.as_deref(),
            self.sort_descending,
        ))
    }
}

fn parse_price(field: &str, raw: Option<&str>) -> Result<Option<Decimal>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => Decimal::from_str(s)
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{field} must be a number"))),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBody {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Uuid,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/products", tag = "Products", security(()),
    params(
        ("search" = Option<String>, Query, description = "Matches name or description"),
        ("categoryId" = Option<Uuid>, Query, description = "Filter by category"),
        ("minPrice" = Option<f64>, Query, description = "Lowest price"),
        ("maxPrice" = Option<f64>, Query, description = "Highest price"),
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("pageSize" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("sortBy" = Option<String>, Query, description = "name, price or createdAt"),
        ("sortDescending" = Option<bool>, Query, description = "Reverse the sort order")
    ),
    responses((status = 200, body = PagedProductsDto)))]
pub async fn list_products(
    State(ctx): State<AppContext>,
    Query(q): Query<ProductListQuery>,
) -> Result<Json<PagedProductsDto>, ApiError> {
    let query = q.into_query()?;
    let repo = ctx.product_repo();
    let uc = ListProducts {
        repo: repo.as_ref(),
    };
    let page = uc.execute(&query).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(get, path = "/api/products/{id}", tag = "Products", security(()),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, body = ProductDto),
        (status = 404, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn get_product(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDto>, ApiError> {
    let repo = ctx.product_repo();
    let uc = GetProduct {
        repo: repo.as_ref(),
    };
    let product = uc
        .execute(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product with ID {id} not found")))?;
    Ok(Json(product.into()))
}

#[utoipa::path(post, path = "/api/products", tag = "Products", request_body = CreateProductBody, responses(
    (status = 201, body = ProductDto),
    (status = 400, body = crate::presentation::http::error::ErrorBody),
    (status = 409, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn create_product(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(body): Json<CreateProductBody>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    access::require(&principal, Policy::SellerOrAdmin)?;
    let products = ctx.product_repo();
    let categories = ctx.category_repo();
    let audit = ctx.audit_repo();
    let uc = CreateProduct {
        products: products.as_ref(),
        categories: categories.as_ref(),
        audit: audit.as_ref(),
    };
    let req = CreateProductRequest {
        name: body.name,
        sku: body.sku,
        description: body.description,
        price: body.price,
        stock_quantity: body.stock_quantity,
        category_id: body.category_id,
    };
    let product = uc.execute(principal.user_id, req).await?;
    tracing::info!(product_id = %product.id, sku = %product.sku, actor = %principal.user_id, "product_created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

#[utoipa::path(put, path = "/api/products/{id}", tag = "Products", request_body = UpdateProductBody,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, body = ProductDto),
        (status = 404, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn update_product(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProductBody>,
) -> Result<Json<ProductDto>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    access::require(&principal, Policy::SellerOrAdmin)?;
    let products = ctx.product_repo();
    let categories = ctx.category_repo();
    let audit = ctx.audit_repo();
    let uc = UpdateProduct {
        products: products.as_ref(),
        categories: categories.as_ref(),
        audit: audit.as_ref(),
    };
    let req = UpdateProductRequest {
        name: body.name,
        description: body.description,
        price: body.price,
        stock_quantity: body.stock_quantity,
        category_id: body.category_id,
        is_active: body.is_active,
    };
    let product = uc.execute(principal.user_id, id, req).await?;
    tracing::info!(product_id = %id, actor = %principal.user_id, "product_updated");
    Ok(Json(product.into()))
}

#[utoipa::path(delete, path = "/api/products/{id}", tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204),
        (status = 404, body = crate::presentation::http::error::ErrorBody),
        (status = 409, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn delete_product(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    access::require(&principal, Policy::AdminOnly)?;
    let repo = ctx.product_repo();
    let audit = ctx.audit_repo();
    let uc = DeleteProduct {
        repo: repo.as_ref(),
        audit: audit.as_ref(),
    };
    uc.execute(principal.user_id, id).await?;
    tracing::info!(product_id = %id, actor = %principal.user_id, "product_deleted");
    Ok(StatusCode::NO_CONTENT)
}
