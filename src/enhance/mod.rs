//! Per-ecosystem enhancement of operation results.
//!
//! An [`Enhancer`] computes every hash the matching stage needs for each
//! library of one ecosystem: the plain file digest, the ecosystem's
//! identity hashes and, for loose files, the content fingerprints.
//! [`Supplementer`] routes operation results to the enhancer registered for
//! their [`LibType`] and runs the per-library work on a bounded thread pool.
//!
//! Hashing failures never abort a result. They are logged and the library
//! simply carries fewer hashes.

mod fs;
mod golang;
mod java;
mod ruby;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::config::{EngineConfig, HashingConfig};
use crate::error::{FingerprintError, Result};
use crate::hash::{HashAlgorithm, IdentityScheme, LibraryIdentity};
use crate::model::{DependencyInfo, EnhancedResult, LibType, Library, OperationResult};

pub use fs::FsEnhancer;
pub use golang::GolangEnhancer;
pub use java::JavaEnhancer;
pub use ruby::RubyEnhancer;

/// Computes hashes for the libraries of one ecosystem.
pub trait Enhancer: Send + Sync {
    /// The ecosystem handled.
    fn lib_type(&self) -> LibType;

    /// Hash one library. `None` drops the library from the enhanced result.
    fn enhance_library(&self, library: &Library, manifest_file: &str) -> Option<DependencyInfo>;

    /// Hash every library of `operation` in parallel.
    ///
    /// Runs on whichever rayon pool is current; output keeps the order of
    /// `operation.libraries`.
    fn enhance(&self, operation: OperationResult) -> EnhancedResult {
        let entries: Vec<_> = operation.libraries.iter().collect();
        let deps: IndexMap<_, _> = entries
            .par_iter()
            .filter_map(|(id, library)| {
                self.enhance_library(library, &operation.manifest_file)
                    .map(|info| ((*id).clone(), info))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect();

        tracing::info!(
            manifest = %operation.manifest_file,
            lib_type = %self.lib_type(),
            libraries = operation.libraries.len(),
            enhanced = deps.len(),
            "enhanced operation result"
        );

        EnhancedResult {
            operation,
            deps,
            vulnerable: IndexMap::new(),
        }
    }
}

/// Registry of enhancers plus the pool they run on.
pub struct Supplementer {
    enhancers: HashMap<LibType, Box<dyn Enhancer>>,
    pool: rayon::ThreadPool,
}

impl Supplementer {
    /// Register the Java, Go, Ruby and file-system enhancers.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.enhance.worker_threads)
            .thread_name(|i| format!("sca-enhance-{i}"))
            .build()
            .map_err(|e| FingerprintError::config(format!("cannot start enhance workers: {e}")))?;

        let mut supplementer = Self {
            enhancers: HashMap::new(),
            pool,
        };
        supplementer.register(Box::new(JavaEnhancer::new(
            config.hashing.clone(),
            config.enhance.skip_unresolved_versions,
        )));
        supplementer.register(Box::new(GolangEnhancer::new(config.hashing.clone())));
        supplementer.register(Box::new(RubyEnhancer::new(config.hashing.clone())));
        supplementer.register(Box::new(FsEnhancer::new(config.hashing.clone())));
        Ok(supplementer)
    }

    /// Add or replace the enhancer for its ecosystem.
    pub fn register(&mut self, enhancer: Box<dyn Enhancer>) {
        self.enhancers.insert(enhancer.lib_type(), enhancer);
    }

    #[must_use]
    pub fn enhancer(&self, lib_type: LibType) -> Option<&dyn Enhancer> {
        self.enhancers.get(&lib_type).map(|enhancer| &**enhancer)
    }

    /// Number of threads hashing runs on.
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Enhance every result that has no error and a registered enhancer.
    pub fn supplement(&self, results: Vec<OperationResult>) -> Vec<EnhancedResult> {
        let mut enhanced = Vec::with_capacity(results.len());
        for operation in results {
            if let Some(error) = &operation.error {
                tracing::debug!(
                    manifest = %operation.manifest_file,
                    error = %error,
                    "skipping failed operation result"
                );
                continue;
            }
            let Some(enhancer) = self.enhancer(operation.lib_type) else {
                tracing::debug!(
                    manifest = %operation.manifest_file,
                    lib_type = %operation.lib_type,
                    "no enhancer registered"
                );
                continue;
            };
            enhanced.push(self.pool.install(|| enhancer.enhance(operation)));
        }
        enhanced
    }
}

impl std::fmt::Debug for Supplementer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.enhancers.keys().map(LibType::as_str).collect();
        types.sort_unstable();
        f.debug_struct("Supplementer")
            .field("enhancers", &types)
            .field("worker_threads", &self.worker_threads())
            .finish()
    }
}

/// Digest of the file at `path`, or empty when there is none or it cannot
/// be read.
fn file_digest(path: Option<&Path>, algorithm: HashAlgorithm) -> String {
    let Some(path) = path else {
        return String::new();
    };
    match algorithm.digest_file(path) {
        Ok(digest) => digest,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to calculate file digest");
            String::new()
        }
    }
}

/// Compute each scheme the metadata allows; the rest are logged and left out.
fn identity_hashes(
    identity: &LibraryIdentity<'_>,
    schemes: &[IdentityScheme],
    algorithm: HashAlgorithm,
) -> BTreeMap<IdentityScheme, String> {
    schemes
        .iter()
        .filter_map(|&scheme| match scheme.compute(identity, algorithm) {
            Ok(digest) => Some((scheme, digest)),
            Err(e) => {
                tracing::debug!(
                    artifact = identity.artifact,
                    version = identity.version,
                    error = %e,
                    "identity hash skipped"
                );
                None
            }
        })
        .collect()
}

/// The ecosystem's own schemes, or all of them when configured.
fn schemes_for<'a>(hashing: &HashingConfig, own: &'a [IdentityScheme]) -> &'a [IdentityScheme] {
    if hashing.all_identity_schemes {
        &IdentityScheme::ALL
    } else {
        own
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Organ;

    struct Uppercase;

    impl Enhancer for Uppercase {
        fn lib_type(&self) -> LibType {
            LibType::Empty
        }

        fn enhance_library(&self, library: &Library, manifest_file: &str) -> Option<DependencyInfo> {
            (!library.artifact.is_empty()).then(|| DependencyInfo {
                artifact_id: library.artifact.to_uppercase(),
                ..DependencyInfo::from_library(library, manifest_file)
            })
        }
    }

    fn supplementer() -> Supplementer {
        Supplementer::new(&EngineConfig::builder().worker_threads(2).build()).unwrap()
    }

    #[test]
    fn test_registered_enhancers() {
        let s = supplementer();
        for lib_type in [LibType::Java, LibType::Golang, LibType::Ruby, LibType::Fs] {
            assert_eq!(s.enhancer(lib_type).map(|e| e.lib_type()), Some(lib_type));
        }
        assert!(s.enhancer(LibType::Empty).is_none());
        assert_eq!(s.worker_threads(), 2);
    }

    #[test]
    fn test_skips_failed_and_unregistered() {
        let s = supplementer();
        let results = vec![
            OperationResult::failed("pom.xml", LibType::Java, Organ::Maven, "mvn exited 1"),
            OperationResult::new("odd", LibType::Empty, Organ::FileSystem)
                .with_direct("x", Library::new(LibType::Empty, "x", "1")),
            OperationResult::new("Gemfile", LibType::Ruby, Organ::Ruby),
        ];
        let enhanced = s.supplement(results);
        assert_eq!(enhanced.len(), 1);
        assert_eq!(enhanced[0].operation.manifest_file, "Gemfile");
    }

    #[test]
    fn test_custom_enhancer_keeps_order() {
        let mut s = supplementer();
        s.register(Box::new(Uppercase));

        let mut op = OperationResult::new("m", LibType::Empty, Organ::FileSystem);
        for name in ["zeta", "", "alpha", "mid"] {
            op = op.with_library(format!("id-{name}"), Library::new(LibType::Empty, name, "1"));
        }
        let enhanced = s.supplement(vec![op]);
        let names: Vec<_> = enhanced[0].deps.values().map(|d| d.artifact_id.as_str()).collect();
        assert_eq!(names, ["ZETA", "ALPHA", "MID"]);
    }

    #[test]
    fn test_file_digest_missing_file_is_empty() {
        assert_eq!(
            file_digest(Some(Path::new("/no/such/file.jar")), HashAlgorithm::Sha1),
            ""
        );
        assert_eq!(file_digest(None, HashAlgorithm::Sha1), "");
    }

    #[test]
    fn test_identity_hashes_leave_out_invalid() {
        let identity = LibraryIdentity {
            artifact: "TestArtifact",
            version: "1.1.1",
            type_tag: "JAVA",
            ..LibraryIdentity::default()
        };
        let hashes = identity_hashes(&identity, &IdentityScheme::ALL, HashAlgorithm::Sha1);
        let schemes: Vec<_> = hashes.keys().copied().collect();
        assert_eq!(
            schemes,
            [IdentityScheme::Avt, IdentityScheme::Avtlc, IdentityScheme::Avtlca]
        );
    }
}
