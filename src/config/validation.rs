//! Configuration validation.

use super::defaults::MAX_WORKER_THREADS;
use super::types::{EngineConfig, EnhanceConfig, RemediationConfig};
use crate::error::{FingerprintError, Result};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for EngineConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.enhance.validate());
        errors.extend(self.remediation.validate());
        errors
    }
}

impl Validatable for EnhanceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.worker_threads > MAX_WORKER_THREADS {
            errors.push(ConfigError {
                field: "enhance.worker_threads".to_string(),
                message: format!(
                    "Worker threads must be at most {MAX_WORKER_THREADS}, got {}",
                    self.worker_threads
                ),
            });
        }
        errors
    }
}

impl Validatable for RemediationConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            for (name, value) in [
                ("group_id", &entry.group_id),
                ("artifact", &entry.artifact),
                ("fix", &entry.fix),
            ] {
                if value.trim().is_empty() {
                    errors.push(ConfigError {
                        field: format!("remediation.entries[{i}].{name}"),
                        message: "must not be empty".to_string(),
                    });
                }
            }
        }
        errors
    }
}

impl EngineConfig {
    /// Return the config if valid, else a [`FingerprintError::Config`]
    /// listing every problem.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(self);
        }
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(FingerprintError::config(message))
    }
}
