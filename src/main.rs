use std::net::SocketAddr;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use shopstream_api::application::use_cases::auth::sweep_reset_tokens::SweepResetTokens;
use shopstream_api::bootstrap::app_context::{AppContext, AppServices};
use shopstream_api::bootstrap::config::Config;
use shopstream_api::infrastructure::db;
use shopstream_api::presentation::http as routes;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            shopstream_api::presentation::http::auth::register,
            shopstream_api::presentation::http::auth::login,
            shopstream_api::presentation::http::auth::logout,
            shopstream_api::presentation::http::auth::me,
            shopstream_api::presentation::http::auth::request_password_reset,
            shopstream_api::presentation::http::auth::confirm_password_reset,
            shopstream_api::presentation::http::categories::list_categories,
            shopstream_api::presentation::http::categories::get_category,
            shopstream_api::presentation::http::categories::create_category,
            shopstream_api::presentation::http::categories::delete_category,
            shopstream_api::presentation::http::products::list_products,
            shopstream_api::presentation::http::products::get_product,
            shopstream_api::presentation::http::products::create_product,
            shopstream_api::presentation::http::products::update_product,
            shopstream_api::presentation::http::products::delete_product,
            shopstream_api::presentation::http::cart::get_cart,
            shopstream_api::presentation::http::cart::add_item,
            shopstream_api::presentation::http::cart::update_item,
            shopstream_api::presentation::http::cart::remove_item,
            shopstream_api::presentation::http::cart::clear_cart,
            shopstream_api::presentation::http::addresses::list_addresses,
            shopstream_api::presentation::http::addresses::create_address,
            shopstream_api::presentation::http::addresses::delete_address,
            shopstream_api::presentation::http::orders::checkout,
            shopstream_api::presentation::http::orders::list_orders,
            shopstream_api::presentation::http::orders::get_order,
            shopstream_api::presentation::http::orders::list_all_orders,
            shopstream_api::presentation::http::orders::update_status,
            shopstream_api::presentation::http::health::health,
        ),
        components(schemas(
            shopstream_api::presentation::http::error::ErrorBody,
            shopstream_api::presentation::http::auth::RegisterRequest,
            shopstream_api::presentation::http::auth::LoginRequest,
            shopstream_api::presentation::http::auth::LoginResponse,
            shopstream_api::presentation::http::auth::UserProfile,
            shopstream_api::presentation::http::auth::PasswordResetRequest,
            shopstream_api::presentation::http::auth::PasswordResetConfirm,
            shopstream_api::presentation::http::auth::MessageResponse,
            shopstream_api::presentation::http::categories::CategoryDto,
            shopstream_api::presentation::http::categories::CreateCategoryBody,
            shopstream_api::presentation::http::products::ProductDto,
            shopstream_api::presentation::http::products::ProductImageDto,
            shopstream_api::presentation::http::products::PagedProductsDto,
            shopstream_api::presentation::http::products::CreateProductBody,
            shopstream_api::presentation::http::products::UpdateProductBody,
            shopstream_api::presentation::http::cart::CartDto,
            shopstream_api::presentation::http::cart::CartItemDto,
            shopstream_api::presentation::http::cart::AddCartItemBody,
            shopstream_api::presentation::http::cart::UpdateCartItemBody,
            shopstream_api::presentation::http::addresses::AddressDto,
            shopstream_api::presentation::http::addresses::CreateAddressBody,
            shopstream_api::presentation::http::orders::OrderDto,
            shopstream_api::presentation::http::orders::OrderItemDto,
            shopstream_api::presentation::http::orders::PaymentDto,
            shopstream_api::presentation::http::orders::CheckoutBody,
            shopstream_api::presentation::http::orders::StatusValue,
            shopstream_api::presentation::http::orders::UpdateStatusBody,
            shopstream_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Authentication and password reset"),
            (name = "Categories", description = "Catalog categories"),
            (name = "Products", description = "Catalog products"),
            (name = "Cart", description = "Shopping cart of the current user"),
            (name = "Addresses", description = "Shipping addresses"),
            (name = "Orders", description = "Checkout and order tracking"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "shopstream_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        api_port = cfg.api_port,
        production = cfg.is_production,
        frontend_url = ?cfg.frontend_url,
        "Starting ShopStream API"
    );

    // Database
    let pool = db::connect_pool(&cfg.database_url, cfg.database_max_connections).await?;
    db::migrate(&pool).await?;
    if cfg.seed_demo_data {
        if let Err(e) = db::seed::seed_demo_data(&pool).await {
            error!(error = ?e, "demo_seed_failed");
        }
    }

    let ctx = AppContext::new(cfg.clone(), AppServices::postgres(pool.clone()));

    // Build API router
    let api_router = Router::new()
        .nest("/api", routes::health::routes(pool.clone()))
        .nest("/api/auth", routes::auth::routes(ctx.clone()))
        .nest("/api", routes::categories::routes(ctx.clone()))
        .nest("/api", routes::products::routes(ctx.clone()))
        .nest("/api", routes::cart::routes(ctx.clone()))
        .nest("/api", routes::addresses::routes(ctx.clone()))
        .nest("/api", routes::orders::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(build_cors(&cfg))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, api_router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    });

    // Background sweep of expired password reset tokens
    let sweep_ctx = ctx.clone();
    let sweep_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        let interval = Duration::from_secs(sweep_ctx.cfg.reset_sweep_interval_secs);
        let repo = sweep_ctx.user_repo();
        loop {
            let uc = SweepResetTokens {
                repo: repo.as_ref(),
            };
            if let Err(e) = uc.execute(chrono::Utc::now()).await {
                tracing::error!(error = ?e, "reset_token_sweep_failed");
            }
            sleep(interval).await;
        }
    });

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }

    // The sweep loop never finishes on its own; stop it with the server.
    sweep_handle.abort();
    match sweep_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "Reset token sweep task failed"),
        Err(e) if e.is_cancelled() => {}
        Err(e) => error!(?e, "Reset token sweep task panicked"),
    }
    pool.close().await;
    Ok(())
}

fn build_cors(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::PATCH,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        // FRONTEND_URL is mandatory in production (checked by Config), deny all otherwise
        _ if cfg.is_production => base.allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("http://invalid"),
        )),
        // Development convenience
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = ?e, "shutdown_signal_failed");
        std::future::pending::<()>().await;
    }
    info!("shutdown_requested");
}
