use super::{Enhancer, file_digest, identity_hashes, schemes_for};
use crate::config::HashingConfig;
use crate::hash::{IdentityScheme, LibraryIdentity};
use crate::model::{DependencyInfo, LibType, Library};

const OWN_SCHEMES: &[IdentityScheme] = &[IdentityScheme::Gavt, IdentityScheme::Gavtlc];

/// Characters that mark an unresolved property placeholder such as
/// `${project.version}`.
const PLACEHOLDER_CHARS: &[char] = &['{', '}', '(', ')', '$'];

/// Maven and Gradle libraries.
///
/// `sha1` is the jar's digest, `additional_sha1` the GAVTLC identity hash.
#[derive(Debug, Clone)]
pub struct JavaEnhancer {
    hashing: HashingConfig,
    skip_unresolved_versions: bool,
}

impl JavaEnhancer {
    #[must_use]
    pub const fn new(hashing: HashingConfig, skip_unresolved_versions: bool) -> Self {
        Self {
            hashing,
            skip_unresolved_versions,
        }
    }

    fn is_invalid(&self, library: &Library) -> bool {
        library.lib_type != LibType::Java
            || library.artifact.is_empty()
            || library.group_id.is_empty()
            || library.version.is_empty()
            || (self.skip_unresolved_versions && library.version.contains(PLACEHOLDER_CHARS))
    }
}

impl Enhancer for JavaEnhancer {
    fn lib_type(&self) -> LibType {
        LibType::Java
    }

    fn enhance_library(&self, library: &Library, manifest_file: &str) -> Option<DependencyInfo> {
        if self.is_invalid(library) {
            tracing::debug!(
                label = %library.label(false),
                "skipping java library with incomplete coordinates"
            );
            return None;
        }

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
            .get(&IdentityScheme::Gavtlc)
            .cloned()
            .unwrap_or_default();
        info.record_checksums();
        Some(info)
    }
}
