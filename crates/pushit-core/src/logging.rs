//! Diagnostic logging. Independent of the per-profile run log written by [`crate::report`].

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::{LocalTime, UtcTime};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::config_directory;

const LOG_FILTER_ENV: &str = "PUSHIT_LOG";
const LOG_DIR_NAME: &str = "logs";
const LOG_FILE_NAME: &str = "pushit.log";

/// Which sinks receive diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingOptions {
    /// JSON lines under `<config dir>/logs/pushit.log`.
    pub json_file: bool,
    /// 0 keeps stderr silent. Each step raises pushit's own level and mirrors it to stderr.
    pub verbosity: u8,
}

impl LoggingOptions {
    /// File only: operator output already goes to stdout and stderr.
    pub fn unattended() -> Self {
        Self {
            json_file: true,
            verbosity: 0,
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

#[derive(Debug)]
struct InstalledLogging {
    _flush_guard: Option<WorkerGuard>,
    log_path: Option<PathBuf>,
}

static INSTALLED: OnceLock<InstalledLogging> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] io::Error),
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install logging subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber once and return the JSON log path, if any.
pub fn init_logging(options: LoggingOptions) -> Result<Option<&'static Path>, LoggingError> {
    if INSTALLED.get().is_none() {
        let installed = install(options)?;
        // A second installer fails in `try_init`, so this `set` never loses.
        let _ = INSTALLED.set(installed);
    }
    Ok(INSTALLED
        .get()
        .and_then(|installed| installed.log_path.as_deref()))
}

/// Where diagnostic JSON lines are written.
pub fn log_directory() -> PathBuf {
    config_directory().join(LOG_DIR_NAME)
}

fn install(options: LoggingOptions) -> Result<InstalledLogging, LoggingError> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut flush_guard = None;
    let mut log_path = None;

    if options.json_file {
        let dir = log_directory();
        fs::create_dir_all(&dir)?;
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, LOG_FILE_NAME));
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .with_file(true)
                .with_line_number(true)
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(build_filter(options.verbosity)?)
                .boxed(),
        );
        flush_guard = Some(guard);
        log_path = Some(dir.join(LOG_FILE_NAME));
    }

    if options.verbosity > 0 {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTime::rfc_3339())
                .with_target(false)
                .with_writer(io::stderr)
                .with_ansi(false)
                .with_filter(build_filter(options.verbosity)?)
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    if let Some(path) = &log_path {
        debug!(path = %path.display(), verbosity = options.verbosity, "Diagnostics enabled");
    }

    Ok(InstalledLogging {
        _flush_guard: flush_guard,
        log_path,
    })
}

fn build_filter(verbosity: u8) -> Result<EnvFilter, ParseError> {
    if let Ok(directives) = env::var(LOG_FILTER_ENV) {
        if !directives.trim().is_empty() {
            return EnvFilter::try_new(directives);
        }
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directives(verbosity)),
    }
}

/// Dependencies (hyper, rustls, keyring) stay at `warn` until `-vvv`.
fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,pushit_core=info,pushit_cli=info",
        1 => "warn,pushit_core=debug,pushit_cli=debug",
        2 => "warn,pushit_core=trace,pushit_cli=trace",
        _ => "debug,pushit_core=trace,pushit_cli=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse_and_grow_with_verbosity() {
        for verbosity in 0..=4 {
            assert!(EnvFilter::try_new(default_directives(verbosity)).is_ok());
        }
        assert!(default_directives(0).contains("pushit_core=info"));
        assert!(default_directives(1).contains("pushit_core=debug"));
        assert!(default_directives(9).starts_with("debug,"));
    }

    #[test]
    fn test_unattended_writes_file_only() {
        let options = LoggingOptions::unattended();
        assert!(options.json_file);
        assert_eq!(options.verbosity, 0);
        assert_eq!(options.with_verbosity(2).verbosity, 2);
    }
}
