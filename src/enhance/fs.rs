use std::path::Path;

use super::{Enhancer, file_digest, identity_hashes};
use crate::config::HashingConfig;
use crate::error::ContentErrorKind;
use crate::hash::{IdentityScheme, LibraryIdentity, SuperHash, other_platform_hash_file, super_hash_file};
use crate::model::{DependencyInfo, LibType, Library};

/// Loose files found on disk.
///
/// Besides the plain digest these get the content fingerprints, so that a
/// reformatted or line-ending-converted copy of a known file still matches.
#[derive(Debug, Clone)]
pub struct FsEnhancer {
    hashing: HashingConfig,
}

impl FsEnhancer {
    #[must_use]
    pub const fn new(hashing: HashingConfig) -> Self {
        Self { hashing }
    }

    fn super_hash(&self, path: &Path) -> Option<SuperHash> {
        match super_hash_file(path, self.hashing.algorithm) {
            Ok(hash) => Some(hash),
            Err(e) => {
                match e.content_kind() {
                    Some(ContentErrorKind::TooSmall { .. } | ContentErrorKind::TooLarge { .. }) => {
                        tracing::debug!(path = %path.display(), error = %e, "no super hash");
                    }
                    _ => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to calculate super hash");
                    }
                }
                None
            }
        }
    }

    fn other_platform_hash(&self, path: &Path) -> Option<String> {
        other_platform_hash_file(path, self.hashing.algorithm)
            .inspect_err(|e| {
                tracing::warn!(path = %path.display(), error = %e, "failed to calculate other platform hash");
            })
            .ok()
    }
}

impl Enhancer for FsEnhancer {
    fn lib_type(&self) -> LibType {
        LibType::Fs
    }

    fn enhance_library(&self, library: &Library, manifest_file: &str) -> Option<DependencyInfo> {
        let algorithm = self.hashing.algorithm;
        let path = library.system_path.as_deref();
        let mut info = DependencyInfo::from_library(library, manifest_file);
        info.sha1 = file_digest(path, algorithm);

        if let Some(path) = path {
            if self.hashing.super_hash {
                info.super_hash = self.super_hash(path);
            }
            if self.hashing.other_platform {
                info.other_platform_sha1 = self.other_platform_hash(path);
            }
        }

        if self.hashing.all_identity_schemes {
            info.identity_hashes = identity_hashes(
                &LibraryIdentity::from(library),
                &IdentityScheme::ALL,
                algorithm,
            );
        }
        info.record_checksums();
        Some(info)
    }
}
