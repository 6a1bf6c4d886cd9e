#![forbid(unsafe_code)]

//! Global `tracing` subscriber setup for binaries.
//!
//! Library code only emits events; nothing is printed until a binary calls
//! [`init`]. Directive precedence: `SCALELAB_LOG`, then `RUST_LOG`, then
//! the configured filter.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

pub const LOG_ENV: &str = "SCALELAB_LOG";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {directive:?}: {message}")]
    Filter { directive: String, message: String },
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Pick the directive string that wins for this process.
pub fn resolve_directive(config: &LoggingConfig) -> String {
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.filter.clone())
}

pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|err| LoggingError::Filter {
        directive: directive.to_string(),
        message: err.to_string(),
    })
}

/// Install the process-wide subscriber. Logs go to stderr so stdout stays
/// free for snapshots and verdicts.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(&resolve_directive(config))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInstalled)
}
