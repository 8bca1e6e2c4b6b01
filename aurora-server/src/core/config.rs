use std::path::PathBuf;
use std::time::Duration;

/// Literal `DB_PATH` value that selects the in-memory engine
pub const MEMORY_DB: &str = "memory";

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:5500,http://localhost:5500";

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | WORK_DIR | ./data | Working directory (database, logs) |
/// | DB_PATH | `<WORK_DIR>/database` | RocksDB directory, or `memory` |
/// | DB_NAMESPACE | aurora | SurrealDB namespace |
/// | DB_DATABASE | main | SurrealDB database |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | - | Log level for the service crates |
/// | LOG_JSON | false | Emit JSON log lines |
/// | LOG_DIR | - | Directory for daily rolling log files |
/// | CORS_ORIGINS | localhost dev origins | Comma-separated allowed origins |
/// | BODY_LIMIT_BYTES | 10485760 | Maximum request body size |
/// | RATE_LIMIT_WINDOW_MS | 900000 | Rate limit window |
/// | RATE_LIMIT_MAX_REQUESTS | 100 | Requests per IP per window |
/// | SYNC_ON_READ | true | Refresh tenant statuses before tenant reads |
/// | SYNC_CONCURRENCY | 8 | Parallel writes during status synchronization |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | Grace period for in-flight requests |
///
/// # Example
///
/// ```ignore
/// DB_PATH=memory HTTP_PORT=8080 cargo run -p aurora-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub work_dir: String,
    pub db_path: String,
    pub db_namespace: String,
    pub db_database: String,
    /// development | staging | production
    pub environment: String,
    pub log_level: Option<String>,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub cors_origins: Vec<String>,
    pub body_limit_bytes: usize,
    pub rate_limit_window_ms: u64,
    pub rate_limit_max_requests: u32,
    /// Run the status synchronizer before tenant list and dashboard reads
    pub sync_on_read: bool,
    pub sync_concurrency: usize,
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let work_dir = get("WORK_DIR").unwrap_or_else(|| "./data".into());
        let db_path = get("DB_PATH").unwrap_or_else(|| {
            PathBuf::from(&work_dir)
                .join("database")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            http_port: get("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            db_path,
            work_dir,
            db_namespace: get("DB_NAMESPACE").unwrap_or_else(|| "aurora".into()),
            db_database: get("DB_DATABASE").unwrap_or_else(|| "main".into()),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: get("LOG_LEVEL").filter(|v| !v.trim().is_empty()),
            log_json: get("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: get("LOG_DIR").filter(|v| !v.trim().is_empty()),
            cors_origins: get("CORS_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            body_limit_bytes: get("BODY_LIMIT_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            rate_limit_window_ms: get("RATE_LIMIT_WINDOW_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(15 * 60 * 1000),
            rate_limit_max_requests: get("RATE_LIMIT_MAX_REQUESTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            sync_on_read: get("SYNC_ON_READ")
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            sync_concurrency: get("SYNC_CONCURRENCY")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(8),
            shutdown_timeout_ms: get("SHUTDOWN_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        }
    }

    /// Override the parts of the configuration tests care about
    pub fn with_overrides(work_dir: impl Into<String>, db_path: impl Into<String>) -> Self {
        let mut config = Self::from_lookup(|_| None);
        config.work_dir = work_dir.into();
        config.db_path = db_path.into();
        config
    }

    /// In-memory configuration for tests
    pub fn in_memory() -> Self {
        Self::with_overrides("./data", MEMORY_DB)
    }

    pub fn is_memory_db(&self) -> bool {
        self.db_path == MEMORY_DB
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Create the working directory (and the database parent directory)
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        if !self.is_memory_db()
            && let Some(parent) = PathBuf::from(&self.db_path).parent()
        {
            std::fs::create_dir_all(parent)?;
        }
        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
