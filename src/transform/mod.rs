//! Streaming byte transforms.
//!
//! A [`Transform`] rewrites bytes from a source slice into a bounded
//! destination slice and reports how far it got. When the destination is
//! too small for the next step it stops and returns
//! [`Status::ShortDestination`]; the caller drains its output and resumes
//! with the unconsumed input. [`TransformReader`] drives any transform over
//! any [`std::io::Read`] and handles that signal internally.
//!
//! - [`StripWhitespace`]: drops tab, CR, LF and space bytes
//! - [`LineEndingSwitch`]: converts CRLF text to LF and LF text to CRLF
//! - [`CountingReader`]: counts bytes passing through a reader
//! - [`OffsetReader`]: exposes only the suffix of a stream after an offset

mod line_ending;
mod reader;
mod whitespace;

pub use line_ending::{LineEnding, LineEndingSwitch};
pub use reader::{CountingReader, OffsetReader, TransformReader};
pub use whitespace::{StripWhitespace, is_whitespace};

/// Outcome of a single [`Transform::transform`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// All of `src` was consumed.
    Done,
    /// `dst` had no room for the next output; retry with the rest of `src`.
    ShortDestination,
}

/// Bytes consumed from `src`, bytes written to `dst`, and why the step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub consumed: usize,
    pub produced: usize,
    pub status: Status,
}

impl Progress {
    pub(crate) const fn new(consumed: usize, produced: usize, status: Status) -> Self {
        Self {
            consumed,
            produced,
            status,
        }
    }
}

/// A resumable byte-to-byte rewrite.
///
/// Implementations never fail on input content. `at_eof` is set once the
/// caller has no more input, so that state held across calls (for example
/// a trailing CR) can be flushed.
pub trait Transform {
    /// Rewrite as much of `src` into `dst` as fits.
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress;

    /// Forget any state carried from previous calls.
    fn reset(&mut self);
}

/// Run a transform over an in-memory buffer.
///
/// Convenience for tests and small inputs; streaming callers should use
/// [`TransformReader`].
pub fn transform_bytes<T: Transform>(transform: T, input: &[u8]) -> Vec<u8> {
    use std::io::Read;

    let mut out = Vec::with_capacity(input.len() + input.len() / 8);
    let mut reader = TransformReader::new(input, transform);
    // reading from a slice cannot fail
    let _ = reader.read_to_end(&mut out);
    out
}
