use crate::application::access::Principal;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::application::use_cases::auth::request_password_reset::RequestPasswordReset;
use crate::application::use_cases::auth::reset_password::ResetPassword;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::user::{User, UserRole};
use crate::presentation::http::error::ApiError;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

const ACCESS_COOKIE: &str = "access_token";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String, example = "Customer")]
    pub role: UserRole,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String, example = "Customer")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/password-reset/request", post(request_password_reset))
        .route("/password-reset/confirm", post(confirm_password_reset))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 400, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let repo = ctx.user_repo();
    let audit = ctx.audit_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
        audit: audit.as_ref(),
    };
    let dto = RegisterDto {
        email: req.email,
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
    };
    let user = uc.execute(&dto).await?;
    tracing::info!(user_id = %user.id, "user_registered");
    issue_session(&ctx.cfg, user)
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 401, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: req.email,
        password: req.password,
    };
    let user = uc.execute(&dto).await.inspect_err(|e| {
        tracing::info!(error = %e, "login_failed");
    })?;
    issue_session(&ctx.cfg, user)
}

#[utoipa::path(get, path = "/api/auth/me", tag = "Auth", responses(
    (status = 200, body = UserProfile),
    (status = 401, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn me(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<UserProfile>, ApiError> {
    let principal = authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let user = uc
        .execute(principal.user_id)
        .await?
        .ok_or_else(ApiError::unauthenticated)?;
    Ok(Json(user.into()))
}

#[utoipa::path(post, path = "/api/auth/password-reset/request", tag = "Auth", request_body = PasswordResetRequest, security(()), responses(
    (status = 200, body = MessageResponse)
))]
pub async fn request_password_reset(
    State(ctx): State<AppContext>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = ctx.user_repo();
    let uc = RequestPasswordReset {
        repo: repo.as_ref(),
        ttl: chrono::Duration::seconds(ctx.cfg.password_reset_ttl_secs),
    };
    if let Some(issued) = uc.execute(&req.email, Utc::now()).await? {
        // No mail delivery; surface the token for local testing only.
        if !ctx.cfg.is_production {
            tracing::debug!(
                user_id = %issued.user_id,
                token = %issued.token,
                expires_at = %issued.expires_at,
                "password_reset_token_issued"
            );
        } else {
            tracing::info!(user_id = %issued.user_id, "password_reset_token_issued");
        }
    }
    Ok(Json(MessageResponse {
        message: "If an account exists for that email, password reset instructions have been sent."
            .into(),
    }))
}

#[utoipa::path(post, path = "/api/auth/password-reset/confirm", tag = "Auth", request_body = PasswordResetConfirm, security(()), responses(
    (status = 200, body = MessageResponse),
    (status = 400, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn confirm_password_reset(
    State(ctx): State<AppContext>,
    Json(req): Json<PasswordResetConfirm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = ctx.user_repo();
    let audit = ctx.audit_repo();
    let uc = ResetPassword {
        repo: repo.as_ref(),
        audit: audit.as_ref(),
    };
    uc.execute(&req.token, &req.new_password, Utc::now()).await?;
    Ok(Json(MessageResponse {
        message: "Password has been reset".into(),
    }))
}

fn issue_session(cfg: &Config, user: User) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let token = encode_token(cfg, &user, Utc::now().timestamp())?;

    // Set HttpOnly cookie with the access token
    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie(&token, cfg.jwt_expires_secs, secure_cookies(cfg));
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, value);
    }

    Ok((
        headers,
        Json(LoginResponse {
            token,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }),
    ))
}

fn encode_token(cfg: &Config, user: &User, now: i64) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        iss: cfg.jwt_issuer.clone(),
        aud: cfg.jwt_audience.clone(),
        exp: (now + cfg.jwt_expires_secs).max(0) as usize,
    };
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

fn secure_cookies(cfg: &Config) -> bool {
    cfg.frontend_url
        .as_deref()
        .map(|u| u.starts_with("https://"))
        .unwrap_or(false)
}

// --- Bearer extractor & JWT utils ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // 1) Prefer Authorization header if present
        if let Some(auth) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ") {
                return Ok(Bearer(t.trim().to_string()));
            }
        }

        // 2) Fallback to HttpOnly cookie `access_token`
        if let Some(cookie_hdr) = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, ACCESS_COOKIE) {
                return Ok(Bearer(token));
            }
        }

        Err(ApiError::unauthenticated())
    }
}

pub(crate) fn validate_bearer(cfg: &Config, token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[cfg.jwt_issuer.as_str()]);
    validation.set_audience(&[cfg.jwt_audience.as_str()]);
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?;
    Ok(data.claims)
}

/// Resolves the caller from a verified token. The role comes from the token,
/// so role changes apply on the next login.
pub fn authenticate(cfg: &Config, bearer: Bearer) -> Result<Principal, ApiError> {
    let claims = validate_bearer(cfg, &bearer.0)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::unauthenticated())?;
    let role = claims
        .role
        .parse::<UserRole>()
        .map_err(|_| ApiError::unauthenticated())?;
    Ok(Principal { user_id, role })
}

// --- Cookie helpers & logout ---

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name && !v.trim().is_empty() {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    // SameSite=Lax suits the same-site SPA deployment.
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "{ACCESS_COOKIE}={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "Auth", responses((status = 204)))]
pub async fn logout(State(ctx): State<AppContext>) -> (HeaderMap, StatusCode) {
    // Clear cookie by setting it expired
    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie("", 0, secure_cookies(&ctx.cfg));
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, value);
    }
    (headers, StatusCode::NO_CONTENT)
}
