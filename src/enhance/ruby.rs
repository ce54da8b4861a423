use super::{Enhancer, file_digest, identity_hashes, schemes_for};
use crate::config::HashingConfig;
use crate::hash::{IdentityScheme, LibraryIdentity};
use crate::model::{DependencyInfo, LibType, Library};

const OWN_SCHEMES: &[IdentityScheme] = &[
    IdentityScheme::Avt,
    IdentityScheme::Avtlc,
    IdentityScheme::Avtlca,
];

/// Ruby gems. `additional_sha1` is the AVT identity hash.
#[derive(Debug, Clone)]
pub struct RubyEnhancer {
    hashing: HashingConfig,
}

impl RubyEnhancer {
    #[must_use]
    pub const fn new(hashing: HashingConfig) -> Self {
        Self { hashing }
    }
}

impl Enhancer for RubyEnhancer {
    fn lib_type(&self) -> LibType {
        LibType::Ruby
    }

    fn enhance_library(&self, library: &Library, manifest_file: &str) -> Option<DependencyInfo> {
        let algorithm = self.hashing.algorithm;
        let mut info = DependencyInfo::from_library(library, manifest_file);
        info.sha1 = file_digest(library.system_path.as_deref(), algorithm);
        info.identity_hashes = identity_hashes(
            &LibraryIdentity::from(library),
            schemes_for(&self.hashing, OWN_SCHEMES),
            algorithm,
        );
        info.additional_sha1 = info
            .identity_hashes
            .get(&IdentityScheme::Avt)
            .cloned()
            .unwrap_or_default();
        info.record_checksums();
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashAlgorithm;

    #[test]
    fn test_additional_sha1_is_avt() {
        let lib = Library::new(LibType::Ruby, "rails", "7.0.4");
        let info = RubyEnhancer::new(HashingConfig::default())
            .enhance_library(&lib, "Gemfile.lock")
            .unwrap();

        assert_eq!(
            info.additional_sha1,
            HashAlgorithm::Sha1.digest_str("rails_7.0.4_RUBY")
        );
        assert_eq!(info.identity_hashes.len(), 3);
    }

    #[test]
    fn test_every_gem_kept() {
        // no version: no identity hashes, but the gem is still reported
        let lib = Library::new(LibType::Ruby, "bundler", "");
        let info = RubyEnhancer::new(HashingConfig::default())
            .enhance_library(&lib, "Gemfile.lock")
            .unwrap();
        assert!(info.additional_sha1.is_empty());
        assert!(info.identity_hashes.is_empty());
        assert_eq!(info.artifact_id, "bundler");
    }
}
