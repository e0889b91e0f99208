//! Structured logging.
//!
//! Console output goes to stderr. When a log directory is configured, a
//! daily-rolling plain-text file is written alongside it. `RUST_LOG`
//! overrides the configured level.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

const LOG_FILE_PREFIX: &str = "airdrop-claimer.log";

/// Build the filter from `RUST_LOG`, falling back to the configured level.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init_logging(config: &ObservabilityConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match config.log_dir.as_deref().filter(|d| writable_dir(d)) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(console_layer)
        .with(file_layer)
        .init();

    if let (Some(dir), None) = (config.log_dir.as_deref(), guard.as_ref()) {
        tracing::warn!(log_dir = dir, "Log directory not writable, file logging disabled");
    }

    guard
}

// rolling::daily panics if the first file cannot be created
fn writable_dir(dir: &str) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = Path::new(dir).join(".write_test");
    match std::fs::OpenOptions::new().create(true).append(true).open(&probe) {
        Ok(_) => {
            let _ = std::fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
