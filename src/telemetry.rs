//! Tracing setup shared by the binaries
//!
//! Logs go to stderr and to a timestamped file under the configured log
//! directory, so stdout stays free for lookup output.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to create log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// File name for a run started at `started`
pub fn log_file_name(prefix: &str, started: DateTime<Local>) -> String {
    format!("{}_{}.log", prefix, started.format("%Y%m%d_%H%M%S"))
}

/// Install the global subscriber; returns the log file path
pub fn init_tracing(
    log_dir: &Path,
    prefix: &str,
    json: bool,
) -> Result<PathBuf, TelemetryError> {
    std::fs::create_dir_all(log_dir)?;
    let log_file = log_dir.join(log_file_name(prefix, Local::now()));
    let file = std::fs::File::create(&log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logger initialized: {}", log_file.display());
    Ok(log_file)
}
