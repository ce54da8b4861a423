//! Digests and fingerprints.
//!
//! - [`HashAlgorithm`]: the pluggable digest used everywhere (SHA-1 by default)
//! - [`super_hash`]: whitespace- and line-ending-tolerant content fingerprints
//! - [`identity`]: metadata fingerprints for libraries without usable content

pub mod identity;
pub mod super_hash;

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha1::Digest;

use crate::error::{FingerprintError, Result};

pub use identity::{IdentityScheme, LibraryIdentity, underscore_digest};
pub use super_hash::{
    MAX_SUPER_HASH_SIZE, MIN_FULL_HASH_SIZE, MIN_PARTIAL_HASH_SIZE, SuperHash, bucket_size,
    other_platform_hash, other_platform_hash_file, super_hash, super_hash_file,
};

/// Checksum map key for the plain content digest.
pub const SHA1_KEY: &str = "SHA1";
/// Checksum map key for the ecosystem's metadata digest.
pub const ADDITIONAL_SHA1_KEY: &str = "ADDITIONAL_SHA1";

/// Digest algorithm used for every hash the engine produces.
///
/// Output is always rendered as lowercase hex.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    /// SHA-1, 160-bit. The vulnerability tables are keyed by it.
    #[default]
    Sha1,
    /// SHA-256
    #[cfg(feature = "sha2-digests")]
    Sha256,
    /// SHA-512
    #[cfg(feature = "sha2-digests")]
    Sha512,
}

impl HashAlgorithm {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            #[cfg(feature = "sha2-digests")]
            Self::Sha256 => "SHA256",
            #[cfg(feature = "sha2-digests")]
            Self::Sha512 => "SHA512",
        }
    }

    /// Length of the hex-encoded digest.
    #[must_use]
    pub const fn hex_len(&self) -> usize {
        match self {
            Self::Sha1 => 40,
            #[cfg(feature = "sha2-digests")]
            Self::Sha256 => 64,
            #[cfg(feature = "sha2-digests")]
            Self::Sha512 => 128,
        }
    }

    /// Digest everything `reader` yields.
    pub fn digest_reader<R: Read>(&self, reader: R) -> io::Result<String> {
        match self {
            Self::Sha1 => stream::<sha1::Sha1, R>(reader),
            #[cfg(feature = "sha2-digests")]
            Self::Sha256 => stream::<sha2::Sha256, R>(reader),
            #[cfg(feature = "sha2-digests")]
            Self::Sha512 => stream::<sha2::Sha512, R>(reader),
        }
    }

    #[must_use]
    pub fn digest_bytes(&self, bytes: &[u8]) -> String {
        match self {
            Self::Sha1 => hex::encode(sha1::Sha1::digest(bytes)),
            #[cfg(feature = "sha2-digests")]
            Self::Sha256 => hex::encode(sha2::Sha256::digest(bytes)),
            #[cfg(feature = "sha2-digests")]
            Self::Sha512 => hex::encode(sha2::Sha512::digest(bytes)),
        }
    }

    #[must_use]
    pub fn digest_str(&self, text: &str) -> String {
        self.digest_bytes(text.as_bytes())
    }

    /// Digest a file's raw content.
    pub fn digest_file(&self, path: &Path) -> Result<String> {
        let file = File::open(path).map_err(|e| FingerprintError::io(path, e))?;
        self.digest_reader(file)
            .map_err(|e| FingerprintError::io(path, e))
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn stream<D, R>(mut reader: R) -> io::Result<String>
where
    D: Digest + io::Write,
    R: Read,
{
    let mut hasher = D::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
