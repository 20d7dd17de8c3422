//! Logging configuration using the tracing framework
//!
//! Logs can be controlled via the RUST_LOG environment variable.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "staffgrid=info,warn";

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("staffgrid=debug,warn")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    })
}

/// Initialize logging to stderr for the command-line interface
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log level (e.g., "debug", "info", "warn", "error")
///   - Default: "staffgrid=info,warn", or "staffgrid=debug,warn" with `--verbose`
///   - Examples:
///     - `RUST_LOG=staffgrid::resolver=trace` - Trace cell resolution only
///
/// # Examples
///
/// ```no_run
/// use staffgrid::logging;
///
/// logging::init(false);
/// tracing::info!("Application started");
/// ```
pub fn init(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();
}

/// Directory holding the rolling log files
pub fn log_dir() -> std::io::Result<PathBuf> {
    if let Some(proj_dirs) = directories::ProjectDirs::from("com", "staffgrid", "staffgrid") {
        let log_path = proj_dirs.data_dir().join("logs");
        std::fs::create_dir_all(&log_path)?;
        Ok(log_path)
    } else {
        std::env::current_dir()
    }
}

/// Initialize logging to a daily-rolling file only
///
/// The interactive dashboard owns the terminal, so nothing may be written to
/// stdout or stderr while it runs. Keep the returned guard alive until exit so
/// buffered lines are flushed.
///
/// ```no_run
/// use staffgrid::logging;
///
/// let _guard = logging::init_with_file("staffgrid.log", false).expect("Failed to initialize logging");
/// ```
pub fn init_with_file(
    log_file_name: &str,
    verbose: bool,
) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir()?, log_file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

    Ok(guard)
}

/// Initialize logging for tests
///
/// Only errors are shown by default.
pub fn init_test() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
        .try_init()
        .ok(); // Ignore errors if already initialized
}
