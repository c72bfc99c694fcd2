//! Logging setup: stdout plus a daily-rolling file in the data directory.
//!
//! `RUST_LOG` overrides the default filter.

use std::{fs, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info,tray_timer=debug,tray_timer_core=debug";
const LOG_FILE_PREFIX: &str = "tray-timer.log";

/// Initialize dual-output logging.
///
/// Returns the file writer's guard, which must be held for the process
/// lifetime so buffered lines are flushed on exit. Falls back to stdout only
/// (and returns `None`) when no log directory is available.
pub(crate) fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let Some(log_dir) = log_dir else {
        init_stdout_only();
        return None;
    };

    if let Err(e) = fs::create_dir_all(log_dir) {
        // Subscriber not installed yet.
        eprintln!(
            "Failed to create log directory {:?}: {}, using stdout only",
            log_dir, e
        );
        init_stdout_only();
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(filter())
        .init();

    tracing::info!(log_dir = ?log_dir, "Logging initialized");

    Some(guard)
}

fn init_stdout_only() {
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter())
        .init();

    tracing::info!("Logging initialized (stdout only)");
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
