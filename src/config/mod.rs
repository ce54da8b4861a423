//! Configuration for the fingerprinting engine.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sca_fingerprint::config::{ConfigPreset, EngineConfig};
//!
//! // Use defaults
//! let config = EngineConfig::default();
//!
//! // Use a preset
//! let config = EngineConfig::from_preset(ConfigPreset::MetadataOnly);
//!
//! // Use builder
//! let config = EngineConfig::builder()
//!     .worker_threads(4)
//!     .super_hash(false)
//!     .build();
//!
//! // Load from file
//! use sca_fingerprint::config::load_config_file;
//! let config = load_config_file(Path::new("sca-fingerprint.yaml"))?;
//! ```
//!
//! # Configuration File
//!
//! ```yaml
//! hashing:
//!   algorithm: sha1
//!   super_hash: true
//! enhance:
//!   worker_threads: 8
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{ConfigPreset, MAX_WORKER_THREADS};
pub use types::{
    EngineConfig, EngineConfigBuilder, EnhanceConfig, HashingConfig, RemediationConfig,
    RemediationEntry,
};
pub use validation::{ConfigError, Validatable};

pub use file::{ConfigFileError, generate_example_config, load_config_file};

/// Generate a JSON Schema for the `EngineConfig` configuration format.
///
/// Editors can use it to validate and autocomplete config files.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(EngineConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
