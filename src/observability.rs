//! Logging setup
//!
//! Two sinks share one `tracing` registry: a console layer filtered by
//! `RUST_LOG` (or the requested level), and an append-only error log that
//! receives every `ERROR` event as one timestamped line.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::errors::{AppError, AppResult};

/// Console filter used when `RUST_LOG` is not set
pub fn default_filter(level: &str) -> String {
    format!("emoji_sync={}", level)
}

/// Install the global subscriber. Call once, before any network activity.
pub fn init_logging(level: &str, error_log: &Path) -> AppResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(error_log)
        .map_err(|e| {
            AppError::configuration(format!(
                "Cannot open error log {}: {}",
                error_log.display(),
                e
            ))
        })?;

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into());

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let error_log_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::ERROR);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(error_log_layer)
        .try_init()
        .map_err(|e| AppError::configuration(format!("Logging already initialized: {}", e)))
}
