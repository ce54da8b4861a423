//! Fuzzy content fingerprints.
//!
//! A [`SuperHash`] is computed over the whitespace-stripped content of a
//! source so that reformatting or a line-ending conversion does not change
//! it. Besides the full digest it carries digests of a leading and a
//! trailing window ("most" and "least" significant bits) whose size grows
//! with the content, so that a partially modified file still shares one of
//! its hashes with the original.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::HashAlgorithm;
use crate::error::{ContentErrorKind, ErrorContext, FingerprintError, Result};
use crate::transform::{
    CountingReader, LineEndingSwitch, OffsetReader, StripWhitespace, TransformReader,
};

/// Largest whitespace-free size accepted (2 GiB).
pub const MAX_SUPER_HASH_SIZE: u64 = 2 * 1024 * 1024 * 1024;
/// Smallest whitespace-free size that gets a full hash.
pub const MIN_FULL_HASH_SIZE: u64 = 512;
/// Smallest whitespace-free size that gets the window hashes.
pub const MIN_PARTIAL_HASH_SIZE: u64 = 2 * 1024;

const SMALL_SOURCE_SIZE: u64 = 3 * 1024;
const SMALL_BUCKET_SIZE: u64 = 1280;

/// Multi-part content fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperHash {
    /// Digest of the whole stripped content
    pub full_hash: String,
    /// Digest of the first `bucket_size` stripped bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_sig_bits_hash: Option<String>,
    /// Digest of the last `bucket_size` stripped bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub least_sig_bits_hash: Option<String>,
    pub algorithm: HashAlgorithm,
    /// Content size after whitespace stripping
    pub stripped_size: u64,
}

impl SuperHash {
    /// True when the content was too small for the window hashes.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.most_sig_bits_hash.is_none() || self.least_sig_bits_hash.is_none()
    }

    /// Reject a partial fingerprint.
    ///
    /// Callers that can make do with the full hash alone simply keep the
    /// value; this is for those that need all three parts.
    pub fn require_complete(self) -> Result<Self> {
        if self.is_partial() {
            return Err(FingerprintError::content(
                "window hashes unavailable",
                ContentErrorKind::TooSmallForPartial {
                    size: self.stripped_size,
                    min: MIN_PARTIAL_HASH_SIZE,
                },
            ));
        }
        Ok(self)
    }

    /// All digests present, full hash first.
    pub fn digests(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.full_hash.as_str())
            .chain(self.most_sig_bits_hash.as_deref())
            .chain(self.least_sig_bits_hash.as_deref())
    }
}

/// Compute the [`SuperHash`] of a seekable source.
///
/// The source is read three times at most (size, full, windows) and left at
/// an unspecified position. Sources whose stripped size is outside
/// [`MIN_FULL_HASH_SIZE`]..=[`MAX_SUPER_HASH_SIZE`] are rejected; sources
/// smaller than [`MIN_PARTIAL_HASH_SIZE`] yield a partial fingerprint.
pub fn super_hash<R: Read + Seek>(source: &mut R, algorithm: HashAlgorithm) -> Result<SuperHash> {
    source.seek(SeekFrom::Start(0))?;
    let size = stripped_size(&mut *source)?;

    if size > MAX_SUPER_HASH_SIZE {
        return Err(FingerprintError::content(
            "super hash",
            ContentErrorKind::TooLarge {
                size,
                max: MAX_SUPER_HASH_SIZE,
            },
        ));
    }
    if size < MIN_FULL_HASH_SIZE {
        return Err(FingerprintError::content(
            "super hash",
            ContentErrorKind::TooSmall {
                size,
                min: MIN_FULL_HASH_SIZE,
            },
        ));
    }

    source.seek(SeekFrom::Start(0))?;
    let full_hash = algorithm.digest_reader(stripped(&mut *source))?;

    let mut hash = SuperHash {
        full_hash,
        most_sig_bits_hash: None,
        least_sig_bits_hash: None,
        algorithm,
        stripped_size: size,
    };
    if size < MIN_PARTIAL_HASH_SIZE {
        tracing::debug!(size, "content too small for window hashes");
        return Ok(hash);
    }

    let bucket = bucket_size(size);

    source.seek(SeekFrom::Start(0))?;
    hash.most_sig_bits_hash = Some(algorithm.digest_reader(stripped(&mut *source).take(bucket))?);

    source.seek(SeekFrom::Start(0))?;
    hash.least_sig_bits_hash = Some(
        algorithm.digest_reader(OffsetReader::new(stripped(&mut *source), size - bucket))?,
    );

    Ok(hash)
}

/// Open `path` and compute its [`SuperHash`].
///
/// The file is closed on every return path.
pub fn super_hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<SuperHash> {
    let mut file = File::open(path).map_err(|e| FingerprintError::io(path, e))?;
    super_hash(&mut file, algorithm).with_context(|| path.display().to_string())
}

/// Number of stripped bytes hashed at each end of the content.
///
/// Small sources use a fixed window; larger ones use a quarter of the sum of
/// the two round numbers (at the leading decimal digit) bracketing the size.
#[must_use]
pub fn bucket_size(size: u64) -> u64 {
    if size <= SMALL_SOURCE_SIZE {
        return SMALL_BUCKET_SIZE;
    }

    let base = 10u64.pow(size.ilog10());
    let high = (size + 1).div_ceil(base) * base;
    let low = high - base;
    (high + low) / 4
}

/// Digest of the content after switching it to the other platform's line
/// endings.
///
/// A file whose only difference from a known reference is CRLF vs LF hashes
/// to the reference's plain digest.
pub fn other_platform_hash<R: Read>(reader: R, algorithm: HashAlgorithm) -> io::Result<String> {
    algorithm.digest_reader(TransformReader::new(reader, LineEndingSwitch::new()))
}

/// Open `path` and compute its other-platform digest.
pub fn other_platform_hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<String> {
    let file = File::open(path).map_err(|e| FingerprintError::io(path, e))?;
    other_platform_hash(file, algorithm).map_err(|e| FingerprintError::io(path, e))
}

fn stripped<R: Read>(reader: R) -> TransformReader<R, StripWhitespace> {
    TransformReader::new(reader, StripWhitespace)
}

fn stripped_size<R: Read>(reader: R) -> io::Result<u64> {
    let mut counter = CountingReader::new(stripped(reader));
    io::copy(&mut counter, &mut io::sink())?;
    Ok(counter.count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_text(lines: usize, ending: &str) -> String {
        (0..lines)
            .map(|i| format!("line {i}: the quick brown fox jumps over the lazy dog{ending}"))
            .collect()
    }

    #[test]
    fn test_bucket_size() {
        for (size, expected) in [
            (47_038_576, 22_500_000),
            (3_855_366, 1_750_000),
            (3156, 1750),
            (130_725, 75_000),
            (18_039_443, 7_500_000),
        ] {
            assert_eq!(bucket_size(size), expected, "size {size}");
        }
    }

    #[test]
    fn test_bucket_size_small_sources() {
        assert_eq!(bucket_size(2048), 1280);
        assert_eq!(bucket_size(3072), 1280);
        assert_eq!(bucket_size(3073), 1750);
    }

    #[test]
    fn test_bucket_size_at_power_of_ten() {
        // 9999 -> [9000, 10000]; 10000 -> [10000, 20000]
        assert_eq!(bucket_size(9999), 4750);
        assert_eq!(bucket_size(10_000), 7500);
    }

    #[test]
    fn test_super_hash_complete() {
        let mut source = Cursor::new(sample_text(200, "\n").into_bytes());
        let hash = super_hash(&mut source, HashAlgorithm::Sha1).unwrap();

        assert_eq!(hash.stripped_size, 8490);
        assert_eq!(hash.full_hash, "3cdb4cf795190f5503c582f474bafbefd29beb2e");
        assert_eq!(
            hash.most_sig_bits_hash.as_deref(),
            Some("1dc6ae3c109d185e989cc3e6e43a18c8f886f463")
        );
        assert_eq!(
            hash.least_sig_bits_hash.as_deref(),
            Some("e6ad9a98733f0087f1df2faa1931db205cb9ee95")
        );
        assert!(!hash.is_partial());
    }

    #[test]
    fn test_super_hash_small_bucket() {
        let mut source = Cursor::new(sample_text(50, "\r\n").into_bytes());
        let hash = super_hash(&mut source, HashAlgorithm::Sha1).unwrap();

        assert_eq!(hash.stripped_size, 2090);
        assert_eq!(hash.full_hash, "eba6bee102a8dcc05293bccd71db2d72c9d61614");
        assert_eq!(
            hash.most_sig_bits_hash.as_deref(),
            Some("cbc049d8c141a95c5a15e356b36e13c1b5024bbb")
        );
        assert_eq!(
            hash.least_sig_bits_hash.as_deref(),
            Some("6b45f9abd813138b463e71f2903751cd665366c4")
        );
    }

    #[test]
    fn test_super_hash_partial() {
        let mut source = Cursor::new(sample_text(30, "\n").into_bytes());
        let hash = super_hash(&mut source, HashAlgorithm::Sha1).unwrap();

        assert_eq!(hash.stripped_size, 1250);
        assert_eq!(hash.full_hash, "8f7441f5de5f1d6780625c12e3f9e9d8a8172ce6");
        assert!(hash.is_partial());
        assert_eq!(hash.digests().count(), 1);

        let err = hash.require_complete().unwrap_err();
        assert!(matches!(
            err.content_kind(),
            Some(ContentErrorKind::TooSmallForPartial { size: 1250, .. })
        ));
    }

    #[test]
    fn test_super_hash_too_small() {
        let mut source = Cursor::new(sample_text(10, "\n").into_bytes());
        let err = super_hash(&mut source, HashAlgorithm::Sha1).unwrap_err();
        assert_eq!(
            err.content_kind(),
            Some(&ContentErrorKind::TooSmall { size: 410, min: 512 })
        );
    }

    #[test]
    fn test_whitespace_only_padding_does_not_count() {
        let mut text = "x".repeat(511);
        text.push_str(&" \t\r\n".repeat(1000));
        let err = super_hash(&mut Cursor::new(text.into_bytes()), HashAlgorithm::Sha1).unwrap_err();
        assert!(matches!(
            err.content_kind(),
            Some(ContentErrorKind::TooSmall { size: 511, .. })
        ));
    }

    #[test]
    fn test_super_hash_starts_from_beginning() {
        let mut source = Cursor::new(sample_text(200, "\n").into_bytes());
        source.seek(SeekFrom::End(0)).unwrap();
        let hash = super_hash(&mut source, HashAlgorithm::Sha1).unwrap();
        assert_eq!(hash.full_hash, "3cdb4cf795190f5503c582f474bafbefd29beb2e");
    }

    #[test]
    fn test_other_platform_hash() {
        let lf = sample_text(50, "\n");
        let crlf = sample_text(50, "\r\n");
        let algo = HashAlgorithm::Sha1;

        assert_eq!(
            other_platform_hash(lf.as_bytes(), algo).unwrap(),
            "3068f1c678b49cbb6fc7f811b96731c8f38a4475"
        );
        assert_eq!(
            other_platform_hash(crlf.as_bytes(), algo).unwrap(),
            "84df219e747f93fecdc6eb2c2b1f57a4dd3f656a"
        );
    }
}
