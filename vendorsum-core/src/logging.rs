//! Logging infrastructure for vendorsum
//!
//! Each entry point appends to its own log file in the state directory,
//! `~/.local/state/vendorsum/` by default.

use crate::config::LoggingConfig;
use std::path::PathBuf;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log file written by the CSV ingestion entry point
pub const INGEST_LOG_FILE: &str = "ingestion_db.log";

/// Log file written by the vendor summary entry point
pub const SUMMARY_LOG_FILE: &str = "vendor_summary.log";

/// Initialize the logging system
///
/// Sets up tracing with:
/// - Append-only file output (no rotation) named `file_name`
/// - Timestamps and levels on every line
/// - Configurable log level via config or RUST_LOG env var
pub fn init(config: &LoggingConfig, file_name: &str) -> crate::error::Result<LoggingGuard> {
    let log_dir = config.log_dir();

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(
        log_file = %log_dir.join(file_name).display(),
        level = %config.level,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Initialize logging for tests (logs to stdout)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Guard that keeps the logging system alive
///
/// When dropped, flushes any pending log writes.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Returns the path of the log file `file_name` under the configured directory
pub fn log_file_path(config: &LoggingConfig, file_name: &str) -> PathBuf {
    config.log_dir().join(file_name)
}
