use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{InventoryRepository, MaintenanceRepository, TenantRepository};
use crate::utils::rate_limit::RateLimiter;
use shared::AppResult;

/// Server state - shared references handed to every handler
///
/// Cloning is cheap: the database handle and the rate limiter are reference
/// counted internally.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Immutable configuration |
/// | db | Surreal<Db> | Embedded database |
/// | rate_limiter | RateLimiter | Per-IP request counters |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub rate_limiter: RateLimiter,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let rate_limiter = RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window(),
        );
        Self {
            config,
            db,
            rate_limiter,
        }
    }

    /// Initialize server state
    ///
    /// 1. Working directory structure
    /// 2. Database (RocksDB under `DB_PATH`, or in-memory)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config.ensure_work_dir_structure().map_err(|e| {
            shared::AppError::internal(format!("Failed to create work directory: {e}"))
        })?;

        let db_service = DbService::open(config).await?;
        Ok(Self::new(config.clone(), db_service.db))
    }

    pub fn tenants(&self) -> TenantRepository {
        TenantRepository::new(self.db.clone())
    }

    pub fn maintenance(&self) -> MaintenanceRepository {
        MaintenanceRepository::new(self.db.clone())
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.db.clone())
    }
}
