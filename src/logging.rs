//! Log setup for the `youtrack` binary.
//!
//! The library only emits `tracing` events. Every HTTP call runs inside a
//! `request{method, url}` span opened by the client, so the log file shows
//! which request an event belongs to and, on span close, how long it took.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Overrides the directory the log file is written to.
pub const LOG_DIR_ENV: &str = "YOUTRACK_LOG_DIR";

const LOG_FILE_PREFIX: &str = "youtrack.log";

/// Targets of this package: the CLI and the SDK.
const TARGETS: [&str; 2] = ["youtrack", "youtrack_sdk"];

/// Filter used when `RUST_LOG` is unset. Verbose runs see every request.
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directives: Vec<String> = TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

/// Install the global subscriber: a daily log file plus, with `verbose`,
/// compact output on stderr. Returns the log directory.
pub fn init(verbose: bool) -> anyhow::Result<PathBuf> {
    let log_dir = log_directory().context("Could not determine the log directory")?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Could not create {}", log_dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let file_layer = fmt::layer()
        .with_writer(RollingFileAppender::new(
            Rotation::DAILY,
            &log_dir,
            LOG_FILE_PREFIX,
        ))
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE);

    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(filter)
        .try_init()?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        "Logging initialized"
    );
    Ok(log_dir)
}

/// `$YOUTRACK_LOG_DIR`, or `youtrack-sdk/logs` under the local data directory.
pub fn log_directory() -> Option<PathBuf> {
    match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::data_local_dir().map(|dir| dir.join("youtrack-sdk").join("logs")),
    }
}
