#![no_main]
use libfuzzer_sys::fuzz_target;
use sca_fingerprint::transform::{LineEndingSwitch, StripWhitespace, TransformReader, transform_bytes};
use std::io::Read;

/// Fuzz the resumable transforms.
///
/// Output must not depend on how the input is chunked, so a reader with
/// one-byte buffers has to agree with the in-memory run.
fuzz_target!(|data: &[u8]| {
    let whole = transform_bytes(LineEndingSwitch::new(), data);
    let mut chunked = Vec::new();
    let mut reader = TransformReader::with_capacity(1, data, LineEndingSwitch::new());
    reader.read_to_end(&mut chunked).unwrap();
    assert_eq!(whole, chunked);

    let stripped = transform_bytes(StripWhitespace, data);
    assert!(!stripped.iter().any(|b| matches!(b, b'\t' | b'\r' | b'\n' | b' ')));
});
