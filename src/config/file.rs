//! Configuration file loading.

use super::types::EngineConfig;
use super::validation::{ConfigError, Validatable};
use std::path::{Path, PathBuf};

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("invalid config file: {}", join_errors(.0))]
    Invalid(Vec<ConfigError>),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigFileError> for crate::error::FingerprintError {
    fn from(err: ConfigFileError) -> Self {
        Self::config(err.to_string())
    }
}

/// Load and validate an `EngineConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<EngineConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: EngineConfig = serde_yaml_ng::from_str(&content)?;
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigFileError::Invalid(errors));
    }
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Generate an example config file from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        "# sca-fingerprint configuration\n\n{}",
        serde_yaml_ng::to_string(&EngineConfig::default()).unwrap_or_default()
    )
}
