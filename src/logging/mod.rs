//! # Logging Setup
//!
//! Every stage of a run reports through human-readable, timestamped, leveled
//! log lines sent both to the console and to a log file next to the output.
//! The logger is constructed explicitly at run start and its lifetime is
//! tied to the guard returned from [`init`]; there is no process-wide
//! implicit configuration beyond the standard `RUST_LOG` filter.

use anyhow::{anyhow, Result as AnyhowResult};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the file appender's worker alive so buffered lines are flushed.
///
/// Hold this for the duration of the run; dropping it ends file logging.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Installs the run's logger: one console layer and one plain-text file
/// layer writing to `file_name` inside `log_dir`.
///
/// The level defaults to `info` and can be adjusted through `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if a global logger is already installed.
pub fn init(log_dir: &Path, file_name: &str) -> AnyhowResult<LoggingGuard> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(filter());

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(non_blocking)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("could not install the logger: {}", e))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
