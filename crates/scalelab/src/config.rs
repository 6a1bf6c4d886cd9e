#![forbid(unsafe_code)]

//! Session configuration.
//!
//! Only ambient knobs live here: the narrator seed and how logs are
//! written. Weights, thresholds and intervals are fixed by the catalog and
//! the core crate and cannot be configured.
//!
//! ```toml
//! # scalelab.toml
//! seed = 42
//!
//! [logging]
//! format = "json"
//! filter = "scalelab=debug"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default filter directive when neither the config nor the environment sets one.
pub const DEFAULT_LOG_FILTER: &str = "scalelab=info";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    /// Seed for the conflict-phrase RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive. `SCALELAB_LOG` and `RUST_LOG` take precedence.
    pub filter: String,
    /// Include event targets in formatted output.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
            filter: DEFAULT_LOG_FILTER.to_string(),
            with_target: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

impl LabConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings that would only fail later, at logging init.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "logging.filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config encode error: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = LabConfig::from_toml_str("").unwrap();
        assert_eq!(config, LabConfig::default());
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.seed.is_none());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = LabConfig::from_toml_str("seed = 7\n[logging]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.with_target);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn tuning_keys_are_rejected() {
        let err = LabConfig::from_toml_str("threshold = 20\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "{err}");
    }

    #[test]
    fn blank_filter_is_invalid() {
        let err = LabConfig::from_toml_str("[logging]\nfilter = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn toml_text_reloads_identically() {
        let config = LabConfig {
            seed: Some(99),
            logging: LoggingConfig {
                format: LogFormat::Pretty,
                filter: "scalelab=trace".into(),
                with_target: false,
            },
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(LabConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = LabConfig::from_toml_file(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn file_on_disk_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scalelab.toml");
        std::fs::write(&path, "seed = 3\n").unwrap();
        assert_eq!(LabConfig::from_toml_file(&path).unwrap().seed, Some(3));
    }
}
