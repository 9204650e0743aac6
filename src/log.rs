//! Tracing setup for the binary.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Result, SynthError};

pub const LOG_FILE_NAME: &str = "tpch_synth.log";

/// Installs the global subscriber.
///
/// Logs go to stderr, filtered by `RUST_LOG` (default `info`, or `debug`
/// when `verbose`). With `log_dir` set, the same events are also written to
/// a daily-rolling file there. Keep the returned guard alive until exit so
/// the file writer flushes.
///
/// Fails before installing anything if the log directory cannot be created.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_NAME)
                .build(dir)
                .map_err(|source| SynthError::LogDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            Ok(None)
        }
    }
}
