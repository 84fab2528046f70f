use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

/// Installs the global subscriber writing to a daily rolling file
/// `<log_dir>/<file_name>.YYYY-MM-DD`. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init(log_dir: &str, file_name: &str, level: Level) -> Result<WorkerGuard> {
    let file_appender = rolling::daily(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}
