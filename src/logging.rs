//! File logging setup
//!
//! The TUI owns stdout, so log output only goes to a file.

use std::{ffi::OsStr, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::constants::DEFAULT_LOG_FILE;

fn open_appender(path: &Path) -> Result<RollingFileAppender, InitError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path.file_name().unwrap_or(OsStr::new(DEFAULT_LOG_FILE));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
}

/// Initialize logging to `path`, filtered by RUST_LOG (default "info").
///
/// An unusable log file is not fatal: a warning goes to stderr and the
/// viewer runs without logging. Keep the returned guard alive until exit,
/// it flushes buffered lines when dropped.
pub fn init(path: &Path) -> Option<WorkerGuard> {
    let file_appender = match open_appender(path) {
        Ok(appender) => appender,
        Err(err) => {
            eprintln!("warning: logging disabled, cannot open {}: {}", path.display(), err);
            return None;
        }
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(env_filter),
        )
        .init();

    Some(guard)
}
