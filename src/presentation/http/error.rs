use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::access::Forbidden;
use crate::application::errors::{
    AddressError, AuthError, CartError, CatalogError, CheckoutError, OrderStatusError,
};

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized("Authentication required".into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "request_failed");
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<Forbidden> for ApiError {
    fn from(err: Forbidden) -> Self {
        tracing::debug!(policy = err.policy.name(), role = %err.role, "policy_denied");
        ApiError::Forbidden("You do not have permission to perform this action".into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::Storage(e) => ApiError::Internal(e),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => ApiError::BadRequest(msg),
            CatalogError::CategoryNotFound | CatalogError::ProductNotFound => {
                ApiError::NotFound(err.to_string())
            }
            CatalogError::DuplicateSku(_)
            | CatalogError::CategoryInUse
            | CatalogError::ProductInUse => ApiError::Conflict(err.to_string()),
            CatalogError::Storage(e) => ApiError::Internal(e),
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ProductNotFound(_) | CartError::LineNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CartError::Storage(e) => ApiError::Internal(e),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::Validation(_) => ApiError::BadRequest(err.to_string()),
            AddressError::NotFound => ApiError::NotFound(err.to_string()),
            AddressError::InUse => ApiError::Conflict(err.to_string()),
            AddressError::Storage(e) => ApiError::Internal(e),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Storage(e) => ApiError::Internal(e),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<OrderStatusError> for ApiError {
    fn from(err: OrderStatusError) -> Self {
        match err {
            OrderStatusError::NotFound(_) => ApiError::NotFound(err.to_string()),
            OrderStatusError::Illegal(_) => ApiError::Conflict(err.to_string()),
            OrderStatusError::Storage(e) => ApiError::Internal(e),
        }
    }
}
