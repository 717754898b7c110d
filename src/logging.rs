use crate::config::Config;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{fmt, EnvFilter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Logging is off unless enabled in config. Returns the worker guard,
/// which must stay alive for the lifetime of the process or buffered
/// lines are lost. A blank `log_file` (or one that cannot be opened)
/// falls back to stderr.
pub fn init(config: &Config) -> Option<WorkerGuard> {
    if !config.log_enabled {
        return None;
    }

    let (writer, guard) = match open_log_file(&config.log_file) {
        Some(file) => tracing_appender::non_blocking(file),
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(log_filter(&config.log_level))
        .with_writer(writer)
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
    Some(guard)
}

/// RUST_LOG wins over the configured level; an unparseable level falls
/// back to "info".
fn log_filter(level: &str) -> EnvFilter {
    let level = effective_level(level);
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn effective_level(level: &str) -> &str {
    let trimmed = level.trim();
    if trimmed.is_empty() {
        "info"
    } else {
        trimmed
    }
}

/// Opens the log file for appending, creating parent directories as
/// needed. None for a blank path or an unopenable file.
fn open_log_file(raw: &str) -> Option<File> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let path = Path::new(trimmed);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = fs::create_dir_all(parent);
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}
