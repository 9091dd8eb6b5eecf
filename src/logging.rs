use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging with console output and a daily-rolling JSON file.
///
/// The returned guard must be held until exit so buffered file logs are flushed.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("motor_catalog=info"));

    // Console layers write to stderr; stdout is reserved for command output
    if fs::create_dir_all(log_dir).is_err() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, "motor_catalog.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Installs the global subscriber, so this is the only test that may call it
    #[test]
    fn test_init_logging_creates_log_dir_and_returns_guard() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let guard = init_logging(&log_dir);
        tracing::info!("logging initialized");

        assert!(guard.is_some());
        assert!(log_dir.is_dir());
        drop(guard);
    }
}
