use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::{self, Policy};
use crate::application::use_cases::categories::create_category::{
    CreateCategory, CreateCategoryRequest,
};
use crate::application::use_cases::categories::delete_category::DeleteCategory;
use crate::application::use_cases::categories::get_category::GetCategory;
use crate::application::use_cases::categories::list_categories::ListCategories;
use crate::bootstrap::app_context::AppContext;
use crate::domain::catalog::category::Category;
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub parent_category_id: Option<Uuid>,
    pub parent_category_name: Option<String>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            parent_category_id: c.parent_category_id,
            parent_category_name: c.parent_category_name,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_category_id: Option<Uuid>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", get(get_category).delete(delete_category))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/categories", tag = "Categories", security(()), responses(
    (status = 200, body = [CategoryDto])
))]
pub async fn list_categories(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    let repo = ctx.category_repo();
    let uc = ListCategories {
        repo: repo.as_ref(),
    };
    let items = uc.execute().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/categories/{id}", tag = "Categories", security(()),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, body = CategoryDto),
        (status = 404, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn get_category(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryDto>, ApiError> {
    let repo = ctx.category_repo();
    let uc = GetCategory {
        repo: repo.as_ref(),
    };
    let category = uc
        .execute(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category with ID {id} not found")))?;
    Ok(Json(category.into()))
}

#[utoipa::path(post, path = "/api/categories", tag = "Categories", request_body = CreateCategoryBody, responses(
    (status = 201, body = CategoryDto),
    (status = 400, body = crate::presentation::http::error::ErrorBody),
    (status = 403, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn create_category(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(body): Json<CreateCategoryBody>,
) -> Result<(StatusCode, Json<CategoryDto>), ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    access::require(&principal, Policy::AdminOnly)?;
    let repo = ctx.category_repo();
    let audit = ctx.audit_repo();
    let uc = CreateCategory {
        repo: repo.as_ref(),
        audit: audit.as_ref(),
    };
    let req = CreateCategoryRequest {
        name: body.name,
        description: body.description,
        parent_category_id: body.parent_category_id,
    };
    let category = uc.execute(principal.user_id, &req).await?;
    tracing::info!(category_id = %category.id, actor = %principal.user_id, "category_created");
    Ok((StatusCode::CREATED, Json(category.into())))
}

#[utoipa::path(delete, path = "/api/categories/{id}", tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204),
        (status = 404, body = crate::presentation::http::error::ErrorBody),
        (status = 409, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn delete_category(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    access::require(&principal, Policy::AdminOnly)?;
    let repo = ctx.category_repo();
    let audit = ctx.audit_repo();
    let uc = DeleteCategory {
        repo: repo.as_ref(),
        audit: audit.as_ref(),
    };
    uc.execute(principal.user_id, id).await?;
    tracing::info!(category_id = %id, actor = %principal.user_id, "category_deleted");
    Ok(StatusCode::NO_CONTENT)
}
