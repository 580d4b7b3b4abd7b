use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

const LOG_FILE: &str = "myq.log";
const DEFAULT_FILTER: &str = "myq=info";

/// Default log directory: $XDG_DATA_HOME/myq/logs
pub fn default_log_dir() -> Option<PathBuf> {
  dirs::data_local_dir().map(|d| d.join("myq").join("logs"))
}

/// Filter directive: RUST_LOG wins over the configured level.
fn filter_directive(config: &LogConfig) -> String {
  std::env::var("RUST_LOG")
    .ok()
    .filter(|v| !v.trim().is_empty())
    .or_else(|| config.level.clone())
    .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber writing to the log file.
///
/// The terminal belongs to the TUI, so nothing is logged to stdout/stderr.
/// Returns the writer guard, which must be held until exit to flush buffered
/// lines, or `None` when no log directory is usable.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
  let dir = config.dir.clone().or_else(default_log_dir)?;
  if std::fs::create_dir_all(&dir).is_err() {
    return None;
  }

  let (writer, guard) = tracing_appender::non_blocking(file_appender(&dir));
  let filter = EnvFilter::try_new(filter_directive(config))
    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

  let installed = tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false),
    )
    .try_init();

  installed.ok().map(|_| guard)
}

fn file_appender(dir: &Path) -> tracing_appender::rolling::RollingFileAppender {
  tracing_appender::rolling::never(dir, LOG_FILE)
}
