#![forbid(unsafe_code)]

use scalelab::{ConfigError, LoggingError};
use thiserror::Error;

use crate::script::ScriptError;

pub const EXIT_USAGE: i32 = 2;
pub const EXIT_CONFIG: i32 = 3;
pub const EXIT_SCRIPT: i32 = 4;
pub const EXIT_IO: i32 = 5;
pub const EXIT_ENCODE: i32 = 6;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("{path}: {source}")]
    Script {
        path: String,
        #[source]
        source: ScriptError,
    },
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            Self::Config(_) | Self::Logging(_) => EXIT_CONFIG,
            Self::Script { .. } => EXIT_SCRIPT,
            Self::Read { .. } | Self::Io(_) => EXIT_IO,
            Self::Json(_) => EXIT_ENCODE,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
