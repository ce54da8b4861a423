//! Named presets and default values.

use super::types::{EngineConfig, EnhanceConfig, HashingConfig, RemediationConfig};

/// Upper bound on `enhance.worker_threads`.
pub const MAX_WORKER_THREADS: usize = 512;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Content and ecosystem identity hashes
    Default,
    /// Identity hashes and plain file digests only; no content re-reads
    MetadataOnly,
    /// Every digest the engine knows, including all identity schemes
    Thorough,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::MetadataOnly => "metadata-only",
            Self::Thorough => "thorough",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "metadata-only" | "metadata" | "fast" => Some(Self::MetadataOnly),
            "thorough" | "full" => Some(Self::Thorough),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "File digests, super hashes and each ecosystem's identity hashes",
            Self::MetadataOnly => "Skip super hash and line-ending variants for faster scans",
            Self::Thorough => "Every content digest plus all six identity schemes",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::MetadataOnly, Self::Thorough]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl EngineConfig {
    /// Create an `EngineConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::MetadataOnly => Self::metadata_only_preset(),
            ConfigPreset::Thorough => Self::thorough_preset(),
        }
    }

    /// Metadata-only preset.
    ///
    /// - No SuperHash and no other-platform digest
    /// - Ecosystem identity hashes only
    #[must_use]
    pub fn metadata_only_preset() -> Self {
        Self {
            hashing: HashingConfig {
                super_hash: false,
                other_platform: false,
                ..HashingConfig::default()
            },
            enhance: EnhanceConfig::default(),
            remediation: RemediationConfig::default(),
        }
    }

    /// Thorough preset.
    ///
    /// - SuperHash and other-platform digest
    /// - All six identity schemes wherever the metadata allows
    #[must_use]
    pub fn thorough_preset() -> Self {
        Self {
            hashing: HashingConfig {
                super_hash: true,
                other_platform: true,
                all_identity_schemes: true,
                ..HashingConfig::default()
            },
            enhance: EnhanceConfig::default(),
            remediation: RemediationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
        assert_eq!(ConfigPreset::from_name("FAST"), Some(ConfigPreset::MetadataOnly));
        assert_eq!(ConfigPreset::from_name("nope"), None);
    }

    #[test]
    fn test_presets_differ() {
        let default = EngineConfig::from_preset(ConfigPreset::Default);
        let metadata = EngineConfig::from_preset(ConfigPreset::MetadataOnly);
        let thorough = EngineConfig::from_preset(ConfigPreset::Thorough);

        assert!(default.hashing.super_hash);
        assert!(!metadata.hashing.super_hash);
        assert!(!metadata.hashing.other_platform);
        assert!(thorough.hashing.all_identity_schemes);
        assert!(!default.hashing.all_identity_schemes);
    }
}
