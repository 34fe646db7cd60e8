use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "study-dashboard.log";

/// Keeps the non-blocking file writer flushing until dropped.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn daily_file_writer(dir: &Path) -> std::io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

/// Installs the global subscriber: stdout always, plus a daily-rolling file
/// when `config.log_dir` is set. Call once, from the binary.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let stdout_layer = fmt::layer().with_target(true);

    let file = config.log_dir.as_deref().and_then(|dir| match daily_file_writer(dir) {
        Ok(writer) => Some(writer),
        Err(err) => {
            // No subscriber yet, so stderr is all we have.
            eprintln!("failed to create log directory {}: {err}", dir.display());
            None
        }
    });

    match file {
        Some((writer, guard)) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            tracing_subscriber::registry()
                .with(env_filter(&config.log_level))
                .with(stdout_layer)
                .with(file_layer)
                .init();
            Some(FileLogGuard { _guard: guard })
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter(&config.log_level))
                .with(stdout_layer)
                .init();
            None
        }
    }
}
