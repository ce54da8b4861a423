#![no_main]
use libfuzzer_sys::fuzz_target;
use sca_fingerprint::hash::{HashAlgorithm, other_platform_hash, super_hash};
use std::io::Cursor;

/// Fuzz the content fingerprint engine.
///
/// Arbitrary bytes either produce a fingerprint or a size error; the full
/// hash never depends on whitespace.
fuzz_target!(|data: &[u8]| {
    let _ = other_platform_hash(data, HashAlgorithm::Sha1);

    let Ok(hash) = super_hash(&mut Cursor::new(data), HashAlgorithm::Sha1) else {
        return;
    };
    let padded: Vec<u8> = data.iter().flat_map(|&b| [b, b' ']).collect();
    if let Ok(again) = super_hash(&mut Cursor::new(&padded), HashAlgorithm::Sha1) {
        assert_eq!(hash.full_hash, again.full_hash);
    }
});
