use super::{Enhancer, identity_hashes, schemes_for};
use crate::config::HashingConfig;
use crate::hash::{IdentityScheme, LibraryIdentity};
use crate::model::{DependencyInfo, LibType, Library};

const OWN_SCHEMES: &[IdentityScheme] = &[
    IdentityScheme::Act,
    IdentityScheme::Avt,
    IdentityScheme::Avtlc,
];

/// Version Go reports for modules without a tagged release.
const PSEUDO_VERSION: &str = "v0.0.0";

/// Go modules.
///
/// Modules carry no files, so `sha1` holds the ACT hash when a commit is
/// known and the AVT hash otherwise.
#[derive(Debug, Clone)]
pub struct GolangEnhancer {
    hashing: HashingConfig,
}

impl GolangEnhancer {
    #[must_use]
    pub const fn new(hashing: HashingConfig) -> Self {
        Self { hashing }
    }
}

fn has_release_version(library: &Library) -> bool {
    !library.version.is_empty() && library.version != PSEUDO_VERSION
}

fn is_invalid(library: &Library) -> bool {
    library.lib_type != LibType::Golang
        || library.artifact.is_empty()
        || (library.commit.is_empty() && !has_release_version(library))
}

impl Enhancer for GolangEnhancer {
    fn lib_type(&self) -> LibType {
        LibType::Golang
    }

    fn enhance_library(&self, library: &Library, manifest_file: &str) -> Option<DependencyInfo> {
        if is_invalid(library) {
            tracing::debug!(module = %library.artifact, "skipping go module without version or commit");
            return None;
        }

        // a pseudo version says nothing about the module, so version-based
        // schemes see it as absent
        let mut identity = LibraryIdentity::from(library);
        if !has_release_version(library) {
            identity.version = "";
        }

        let mut info = DependencyInfo::from_library(library, manifest_file);
        info.group_id.clone_from(&library.artifact);
        info.identity_hashes = identity_hashes(
            &identity,
            schemes_for(&self.hashing, OWN_SCHEMES),
            self.hashing.algorithm,
        );

        let primary = if library.commit.is_empty() {
            IdentityScheme::Avt
        } else {
            IdentityScheme::Act
        };
        info.sha1 = info
            .identity_hashes
            .get(&primary)
            .cloned()
            .unwrap_or_default();
        info.record_checksums();
        Some(info)
    }
}
