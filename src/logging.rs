use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Cannot create log directory: {0}")]
    CreateDir(#[from] std::io::Error),
    #[error("Cannot install subscriber: {0}")]
    Subscriber(String),
}

/// Install the global tracing subscriber, writing to a daily rolling file in
/// `log_dir`. The TUI owns the terminal, so nothing is written to stdout.
///
/// `RUST_LOG` takes precedence over `level`. The returned guard must be kept
/// alive for buffered lines to reach the file.
pub fn init(log_dir: &Path, level: &str) -> Result<WorkerGuard, LoggingError> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "habitgrid.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_ansi(false)
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| LoggingError::Subscriber(error.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_log_dir_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "").unwrap();

        let result = init(&file.join("logs"), "info");
        assert!(matches!(result, Err(LoggingError::CreateDir(_))));
    }
}
