//! **Identification and matching engine for software composition analysis.**
//!
//! `sca-fingerprint` takes the dependency records produced by package
//! resolvers (Maven, Go modules, Bundler, plain directories), computes every
//! fingerprint a known-vulnerable library could be recorded under, matches
//! them against a vulnerability lookup and renders the resulting dependency
//! trees with the vulnerable paths highlighted.
//!
//! ## Key Features
//!
//! - **Content fingerprints**: the plain file digest, a [`SuperHash`] that is
//!   stable under whitespace and line-ending changes, and the digest of the
//!   file as it would look with the other platform's line endings.
//! - **Identity fingerprints**: six [`IdentityScheme`]s hashing group,
//!   artifact, version, commit and type metadata for libraries that have no
//!   usable file on disk.
//! - **Dependency trees**: cyclic and re-entrant adjacency tables are turned
//!   into a finite forest where every library is expanded once.
//! - **Vulnerability taint**: a matched library marks every ancestor, so the
//!   paths leading to it can be printed.
//!
//! ## Core Concepts & Modules
//!
//! - **[`transform`]**: resumable byte transforms (whitespace stripping,
//!   CRLF/LF switching) and the readers that drive them.
//! - **[`hash`]**: digest algorithms, [`SuperHash`] and identity schemes.
//! - **[`model`]**: [`OperationResult`] in, [`EnhancedResult`] out.
//! - **[`tree`]**: dependency forest assembly and rendering.
//! - **[`enhance`]**: per-ecosystem [`Enhancer`]s run by the [`Supplementer`].
//! - **[`matching`]**: [`VulnerabilityLookup`] and remediation tables.
//! - **[`pipeline`]**: [`ScanPipeline`] tying the stages together.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use sca_fingerprint::{
//!     EngineConfig, LibType, Library, OperationResult, Organ, ScanPipeline, VulnerabilityTable,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = VulnerabilityTable::load_dir(Path::new("cve"))?;
//!     let pipeline = ScanPipeline::new(EngineConfig::default(), table)?;
//!
//!     let pom = OperationResult::new("pom.xml", LibType::Java, Organ::Maven).with_direct(
//!         "log4j-core",
//!         Library::java("org.apache.logging.log4j", "log4j-core", "2.14.1"),
//!     );
//!
//!     let report = pipeline.run(vec![pom]);
//!     report.write_summary(&mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Fingerprinting a Single File
//!
//! ```no_run
//! use std::path::Path;
//! use sca_fingerprint::hash::{HashAlgorithm, super_hash_file};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hash = super_hash_file(Path::new("vendor/jquery.js"), HashAlgorithm::Sha1)?;
//!     println!("{}", hash.full_hash);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `sha2-digests` (default): enables SHA-256 and SHA-512 as
//!   [`HashAlgorithm`] choices. SHA-1 is always available since the
//!   vulnerability tables are keyed by it.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Byte counts move between u64 and usize; buffers are bounded well below both
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    clippy::similar_names
)]

pub mod config;
pub mod enhance;
pub mod error;
pub mod hash;
pub mod matching;
pub mod model;
pub mod pipeline;
pub mod transform;
pub mod tree;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigPreset, EngineConfig, EngineConfigBuilder, Validatable};
pub use enhance::{Enhancer, Supplementer};
pub use error::{ErrorContext, FingerprintError, Result};
pub use hash::{HashAlgorithm, IdentityScheme, LibraryIdentity, SuperHash, super_hash};
pub use matching::{
    RemediationTable, VulnerabilityLookup, VulnerabilityTable, match_vulnerabilities,
};
pub use model::{
    DependencyInfo, EnhancedResult, LibScope, LibType, Library, LibraryId, OperationResult, Organ,
    VulnerableLib,
};
pub use pipeline::{ScanPipeline, ScanReport};
pub use tree::{DependencyGraph, DependencyNode};
