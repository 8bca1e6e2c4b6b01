//! Aurora Server - property management backend
//!
//! Tenants, maintenance requests and apartment inventory over a JSON REST API,
//! stored in an embedded SurrealDB.
//!
//! ```text
//! aurora-server/src/
//! ├── core/          # config, state, server, startup errors
//! ├── db/            # database service, records, repositories
//! ├── services/      # status sync, aggregates, router assembly
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, validation, rate limiting
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use services::http::{build_app, build_router};
pub use utils::{ApiResponse, AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Initialise logging from the loaded configuration
///
/// Production always logs JSON.
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    init_logger_with_file(
        config.log_level.as_deref(),
        config.log_json || config.is_production(),
        config.log_dir.as_deref(),
    )
}
