//! Configuration types for the fingerprinting engine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::hash::HashAlgorithm;

// ============================================================================
// Unified Engine Configuration
// ============================================================================

/// Top-level configuration, loadable from a YAML file.
///
/// Every section defaults independently, so a file only needs the keys it
/// changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Which digests are computed
    pub hashing: HashingConfig,
    /// Per-library enhancement behavior
    pub enhance: EnhanceConfig,
    /// Fix suggestions shown for vulnerable libraries
    pub remediation: RemediationConfig,
}

impl EngineConfig {
    /// Create a new `EngineConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `EngineConfig` builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

// ============================================================================
// Builder for EngineConfig
// ============================================================================

/// Builder for constructing `EngineConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the digest algorithm.
    pub const fn algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.hashing.algorithm = algorithm;
        self
    }

    /// Enable or disable SuperHash computation for file-system libraries.
    pub const fn super_hash(mut self, enabled: bool) -> Self {
        self.config.hashing.super_hash = enabled;
        self
    }

    /// Enable or disable the other-platform line-ending digest.
    pub const fn other_platform(mut self, enabled: bool) -> Self {
        self.config.hashing.other_platform = enabled;
        self
    }

    /// Compute every applicable identity scheme, not just the ecosystem's own.
    pub const fn all_identity_schemes(mut self, enabled: bool) -> Self {
        self.config.hashing.all_identity_schemes = enabled;
        self
    }

    /// Set the enhancement worker count (0 = available cores).
    pub const fn worker_threads(mut self, threads: usize) -> Self {
        self.config.enhance.worker_threads = threads;
        self
    }

    /// Skip Java libraries whose version is an unresolved placeholder.
    pub const fn skip_unresolved_versions(mut self, skip: bool) -> Self {
        self.config.enhance.skip_unresolved_versions = skip;
        self
    }

    /// Add a remediation entry.
    pub fn remediation(
        mut self,
        group_id: impl Into<String>,
        artifact: impl Into<String>,
        fix: impl Into<String>,
    ) -> Self {
        self.config.remediation.entries.push(RemediationEntry {
            group_id: group_id.into(),
            artifact: artifact.into(),
            fix: fix.into(),
        });
        self
    }

    /// Keep or drop the built-in remediation entries.
    pub const fn include_default_remediation(mut self, include: bool) -> Self {
        self.config.remediation.include_defaults = include;
        self
    }

    /// Build the `EngineConfig`.
    #[must_use]
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

// ============================================================================
// Section configurations
// ============================================================================

/// Digest selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HashingConfig {
    /// Digest algorithm for every hash (vulnerability tables are keyed by sha1)
    pub algorithm: HashAlgorithm,
    /// Compute the whitespace-tolerant SuperHash for file-system libraries
    pub super_hash: bool,
    /// Compute the digest after a CRLF/LF switch for file-system libraries
    pub other_platform: bool,
    /// Compute all six identity schemes where the metadata allows
    pub all_identity_schemes: bool,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            super_hash: true,
            other_platform: true,
            all_identity_schemes: false,
        }
    }
}

/// Enhancement behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Worker threads for per-library hashing (0 = available cores)
    #[schemars(range(max = 512))]
    pub worker_threads: usize,
    /// Skip Java libraries whose version contains `{`, `}`, `(`, `)` or `$`
    pub skip_unresolved_versions: bool,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            skip_unresolved_versions: true,
        }
    }
}

/// Remediation suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RemediationConfig {
    /// Start from the built-in log4j upgrade suggestions
    pub include_defaults: bool,
    /// Extra suggestions; these override built-in ones for the same library
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<RemediationEntry>,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            entries: Vec::new(),
        }
    }
}

/// One fix suggestion, keyed by group and artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RemediationEntry {
    pub group_id: String,
    pub artifact: String,
    /// Text shown to the user, e.g. "Upgrade to version g:a:1.2.3"
    pub fix: String,
}
