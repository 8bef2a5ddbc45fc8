use erp_auth::AuthService;
use erp_catalog_sync::repository::{PostgresSyncRepository, SyncRepository};
use erp_catalog_sync::storefront_client::StorefrontClient;
use erp_catalog_sync::supplier_client::SupplierClient;
use erp_core::error::Result;
use erp_core::rate_limit::{FixedIntervalPacer, RateLimiter, RedisTokenBucket};
use erp_core::{Config, DatabasePool, TenantContext};
use erp_master_data::customer::repository::{CustomerRepository, PostgresCustomerRepository};
use erp_master_data::customer::service::{CustomerService, DefaultCustomerService};
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DatabasePool,
    pub redis: ConnectionManager,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Create a CustomerRepository for a specific tenant context
    pub fn customer_repository(&self, tenant_context: TenantContext) -> Box<dyn CustomerRepository> {
        Box::new(PostgresCustomerRepository::new(self.db.main_pool.clone(), tenant_context))
    }

    /// Create a CustomerService for a specific tenant context with business logic
    pub fn customer_service(&self, tenant_context: TenantContext) -> Box<dyn CustomerService> {
        let repository = self.customer_repository(tenant_context.clone());
        Box::new(DefaultCustomerService::new(repository, tenant_context))
    }

    /// The catalog-sync persistence layer, backed by the same main pool
    /// every other tenant-scoped repository in this process uses.
    pub fn sync_repository(&self) -> Arc<dyn SyncRepository> {
        Arc::new(PostgresSyncRepository::new(self.db.main_pool.clone()))
    }

    fn rate_limiter(&self) -> RateLimiter {
        let cfg = &self.config.supplier;
        if cfg.global_rate_limit_enabled {
            RateLimiter::Distributed(RedisTokenBucket::new(
                self.redis.clone(),
                &cfg.global_rate_limit_key_prefix,
                &cfg.environment_tag,
                "dropshipzone",
                &cfg.email,
                cfg.global_rate_limit_max_rpm,
                cfg.global_rate_limit_burst,
                Duration::from_secs(60),
                Duration::from_secs(5),
            ))
        } else {
            RateLimiter::Local(FixedIntervalPacer::new(cfg.rate_limit_per_minute))
        }
    }

    /// A fresh supplier HTTP client for one request's worth of work — it
    /// holds no connection-pool state worth reusing across handlers, so
    /// unlike the repository it isn't cached on `AppState`.
    pub fn supplier_client(&self) -> Result<Arc<SupplierClient>> {
        let limiter = self.rate_limiter();
        Ok(Arc::new(SupplierClient::new(self.config.supplier.clone(), limiter)?))
    }

    pub fn storefront_client(&self) -> Result<Arc<StorefrontClient>> {
        Ok(Arc::new(StorefrontClient::new(self.config.storefront.clone())?))
    }
}