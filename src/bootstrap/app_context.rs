use std::sync::Arc;

use crate::application::ports::address_repository::AddressRepository;
use crate::application::ports::audit_log_repository::AuditLogRepository;
use crate::application::ports::cart_repository::CartRepository;
use crate::application::ports::category_repository::CategoryRepository;
use crate::application::ports::order_repository::OrderRepository;
use crate::application::ports::payment_processor::PaymentProcessor;
use crate::application::ports::product_repository::ProductRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::address_repository_sqlx::SqlxAddressRepository;
use crate::infrastructure::db::repositories::audit_log_repository_sqlx::SqlxAuditLogRepository;
use crate::infrastructure::db::repositories::cart_repository_sqlx::SqlxCartRepository;
use crate::infrastructure::db::repositories::category_repository_sqlx::SqlxCategoryRepository;
use crate::infrastructure::db::repositories::order_repository_sqlx::SqlxOrderRepository;
use crate::infrastructure::db::repositories::product_repository_sqlx::SqlxProductRepository;
use crate::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use crate::infrastructure::payments::MockPaymentProcessor;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    pool: PgPool,
    user_repo: Arc<dyn UserRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    product_repo: Arc<dyn ProductRepository>,
    cart_repo: Arc<dyn CartRepository>,
    address_repo: Arc<dyn AddressRepository>,
    order_repo: Arc<dyn OrderRepository>,
    audit_repo: Arc<dyn AuditLogRepository>,
    payments: Arc<dyn PaymentProcessor>,
}

impl AppServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        user_repo: Arc<dyn UserRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        product_repo: Arc<dyn ProductRepository>,
        cart_repo: Arc<dyn CartRepository>,
        address_repo: Arc<dyn AddressRepository>,
        order_repo: Arc<dyn OrderRepository>,
        audit_repo: Arc<dyn AuditLogRepository>,
        payments: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self {
            pool,
            user_repo,
            category_repo,
            product_repo,
            cart_repo,
            address_repo,
            order_repo,
            audit_repo,
            payments,
        }
    }

    /// Wires every port to its Postgres adapter and the mock payment processor.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            pool.clone(),
            Arc::new(SqlxUserRepository::new(pool.clone())),
            Arc::new(SqlxCategoryRepository::new(pool.clone())),
            Arc::new(SqlxProductRepository::new(pool.clone())),
            Arc::new(SqlxCartRepository::new(pool.clone())),
            Arc::new(SqlxAddressRepository::new(pool.clone())),
            Arc::new(SqlxOrderRepository::new(pool.clone())),
            Arc::new(SqlxAuditLogRepository::new(pool)),
            Arc::new(MockPaymentProcessor::new()),
        )
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn pool(&self) -> PgPool {
        self.services.pool.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn category_repo(&self) -> Arc<dyn CategoryRepository> {
        self.services.category_repo.clone()
    }

    pub fn product_repo(&self) -> Arc<dyn ProductRepository> {
        self.services.product_repo.clone()
    }

    pub fn cart_repo(&self) -> Arc<dyn CartRepository> {
        self.services.cart_repo.clone()
    }

    pub fn address_repo(&self) -> Arc<dyn AddressRepository> {
        self.services.address_repo.clone()
    }

    pub fn order_repo(&self) -> Arc<dyn OrderRepository> {
        self.services.order_repo.clone()
    }

    pub fn audit_repo(&self) -> Arc<dyn AuditLogRepository> {
        self.services.audit_repo.clone()
    }

    pub fn payments(&self) -> Arc<dyn PaymentProcessor> {
        self.services.payments.clone()
    }
}
