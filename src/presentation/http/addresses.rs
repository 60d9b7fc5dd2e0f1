use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::addresses::create_address::CreateAddress;
use crate::application::use_cases::addresses::delete_address::DeleteAddress;
use crate::application::use_cases::addresses::list_addresses::ListAddresses;
use crate::bootstrap::app_context::AppContext;
use crate::domain::addresses::address::{Address, NewAddress};
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    pub id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

impl From<Address> for AddressDto {
    fn from(a: Address) -> Self {
        Self {
            id: a.id,
            street: a.street,
            city: a.city,
            state: a.state,
            zip_code: a.zip_code,
            country: a.country,
            is_default: a.is_default,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressBody {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/addresses", get(list_addresses).post(create_address))
        .route("/addresses/:id", delete(delete_address))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/addresses", tag = "Addresses", responses(
    (status = 200, body = [AddressDto])
))]
pub async fn list_addresses(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<Vec<AddressDto>>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.address_repo();
    let uc = ListAddresses {
        repo: repo.as_ref(),
    };
    let items = uc.execute(principal.user_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/api/addresses", tag = "Addresses", request_body = CreateAddressBody, responses(
    (status = 201, body = AddressDto),
    (status = 400, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn create_address(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(body): Json<CreateAddressBody>,
) -> Result<(StatusCode, Json<AddressDto>), ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.address_repo();
    let uc = CreateAddress {
        repo: repo.as_ref(),
    };
    let input = NewAddress {
        street: body.street,
        city: body.city,
        state: body.state,
        zip_code: body.zip_code,
        country: body.country,
        is_default: body.is_default,
    };
    let address = uc.execute(principal.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(address.into())))
}

#[utoipa::path(delete, path = "/api/addresses/{id}", tag = "Addresses",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 204),
        (status = 404, body = crate::presentation::http::error::ErrorBody),
        (status = 409, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn delete_address(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.address_repo();
    let uc = DeleteAddress {
        repo: repo.as_ref(),
    };
    uc.execute(principal.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
