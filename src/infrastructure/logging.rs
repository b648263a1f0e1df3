//! Logging setup

use std::fs::OpenOptions;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use crate::application::errors::BotError;
use crate::infrastructure::config::LogConfig;

/// Keeps the file writer flushing until dropped
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Install the global subscriber. A log file that cannot be opened falls
/// back to stdout with a warning instead of failing startup.
pub fn init(config: &LogConfig) -> LogGuard {
    let filter = || {
        EnvFilter::from_default_env().add_directive(config.level.as_tracing().into())
    };

    let Some(path) = config.file.as_deref() else {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_env_filter(filter())
            .init();
        return LogGuard { _guard: None };
    };

    match open_log_file(path) {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_env_filter(filter())
                .init();
            LogGuard { _guard: Some(guard) }
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_env_filter(filter())
                .init();
            tracing::warn!("{}, logging to stdout", e);
            LogGuard { _guard: None }
        }
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File, BotError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| BotError::LogSink(format!("cannot open {}: {}", path.display(), e)))
}
