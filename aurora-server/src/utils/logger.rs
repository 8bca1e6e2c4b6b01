//! Logging Infrastructure
//!
//! Console output (pretty for development, JSON for production) plus an
//! optional daily rotating file.

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor a level is configured
pub const DEFAULT_FILTER: &str = "aurora_server=info,tower_http=info";

/// Rotated log files kept on disk
const MAX_LOG_FILES: usize = 14;

/// Resolve the filter directive: `RUST_LOG` wins, then `level`, then the default
pub fn filter_directive(level: Option<&str>) -> String {
    std::env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| level.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Filter directive (e.g. "debug", "aurora_server=debug"); `None` for the default
/// * `json_format` - JSON lines on the console instead of the pretty format
/// * `log_dir` - Optional directory for daily rotating `aurora-server.*` files
pub fn init_logger_with_file(
    level: Option<&str>,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_new(filter_directive(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_console = json_format.then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
    });
    let pretty_console = (!json_format).then(|| fmt::layer().with_target(true));

    let file_layer = match log_dir {
        Some(dir) => {
            let dir = Path::new(dir);
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("aurora-server")
                .filename_suffix("log")
                .max_log_files(MAX_LOG_FILES)
                .build(dir)?;
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(appender)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_console)
        .with(pretty_console)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Console-only logging
pub fn init_logger(level: Option<&str>, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}
