//! Database Module
//!
//! Embedded SurrealDB (RocksDB on disk, or in-memory) and idempotent schema setup

pub mod models;
pub mod repository;

use crate::core::Config;
use shared::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Tables are schemaless; only indexes are declared.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS tenant SCHEMALESS;
DEFINE INDEX IF NOT EXISTS tenant_apartment ON tenant FIELDS apartmentNumber;
DEFINE INDEX IF NOT EXISTS tenant_status ON tenant FIELDS status;
DEFINE INDEX IF NOT EXISTS tenant_checkin ON tenant FIELDS checkinDate;

DEFINE TABLE IF NOT EXISTS maintenance SCHEMALESS;
DEFINE INDEX IF NOT EXISTS maintenance_apartment ON maintenance FIELDS apartmentNumber;
DEFINE INDEX IF NOT EXISTS maintenance_status ON maintenance FIELDS status;
DEFINE INDEX IF NOT EXISTS maintenance_priority ON maintenance FIELDS priority;
DEFINE INDEX IF NOT EXISTS maintenance_reported ON maintenance FIELDS reportedDate;
DEFINE INDEX IF NOT EXISTS maintenance_type ON maintenance FIELDS `type`;

DEFINE TABLE IF NOT EXISTS inventory SCHEMALESS;
DEFINE INDEX IF NOT EXISTS inventory_apartment ON inventory FIELDS apartmentNumber;
DEFINE INDEX IF NOT EXISTS inventory_category ON inventory FIELDS category;
DEFINE INDEX IF NOT EXISTS inventory_type ON inventory FIELDS `type`;
DEFINE INDEX IF NOT EXISTS inventory_status ON inventory FIELDS status;
DEFINE INDEX IF NOT EXISTS inventory_condition ON inventory FIELDS condition;
"#;

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the database selected by `config` and apply the schema
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        let db = if config.is_memory_db() {
            Surreal::new::<Mem>(())
                .await
                .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?
        } else {
            Surreal::new::<RocksDb>(config.db_path.as_str())
                .await
                .map_err(|e| {
                    AppError::database(format!(
                        "Failed to open database at {}: {e}",
                        config.db_path
                    ))
                })?
        };

        Self::init(db, &config.db_namespace, &config.db_database).await
    }

    /// Select namespace/database on an opened handle and apply the schema
    pub async fn init(db: Surreal<Db>, namespace: &str, database: &str) -> Result<Self, AppError> {
        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

        tracing::info!(
            namespace,
            database,
            "Database connection established"
        );

        Ok(Self { db })
    }
}
