use std::io::{self, Read};

use super::{Status, Transform};

const DEFAULT_BUF_SIZE: usize = 8 * 1024;

/// A reader that applies a [`Transform`] to everything read from `inner`.
///
/// Memory use is two fixed buffers regardless of stream length. If a
/// transform step cannot produce anything because the output buffer is too
/// small, the buffer is doubled and the step retried; that signal never
/// reaches the caller.
pub struct TransformReader<R, T> {
    inner: R,
    transform: T,
    src: Vec<u8>,
    src_start: usize,
    src_end: usize,
    dst: Vec<u8>,
    dst_start: usize,
    dst_end: usize,
    eof: bool,
    finished: bool,
}

impl<R: Read, T: Transform> TransformReader<R, T> {
    pub fn new(inner: R, transform: T) -> Self {
        Self::with_capacity(DEFAULT_BUF_SIZE, inner, transform)
    }

    pub fn with_capacity(capacity: usize, inner: R, transform: T) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            transform,
            src: vec![0; capacity],
            src_start: 0,
            src_end: 0,
            dst: vec![0; capacity],
            dst_start: 0,
            dst_end: 0,
            eof: false,
            finished: false,
        }
    }

    /// Recover the wrapped reader, dropping any buffered data.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill_src(&mut self) -> io::Result<()> {
        self.src_start = 0;
        self.src_end = 0;
        loop {
            match self.inner.read(&mut self.src) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.src_end = n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read, T: Transform> Read for TransformReader<R, T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if self.dst_start < self.dst_end {
                let n = (self.dst_end - self.dst_start).min(buf.len());
                buf[..n].copy_from_slice(&self.dst[self.dst_start..self.dst_start + n]);
                self.dst_start += n;
                return Ok(n);
            }
            if self.finished {
                return Ok(0);
            }
            self.dst_start = 0;
            self.dst_end = 0;

            if self.src_start == self.src_end && !self.eof {
                self.fill_src()?;
            }

            let progress = self.transform.transform(
                &mut self.dst,
                &self.src[self.src_start..self.src_end],
                self.eof,
            );
            self.src_start += progress.consumed;
            self.dst_end = progress.produced;

            match progress.status {
                Status::ShortDestination if progress.produced == 0 => {
                    let grown = self.dst.len() * 2;
                    self.dst.resize(grown, 0);
                }
                Status::Done if self.eof && self.src_start == self.src_end => {
                    self.finished = true;
                }
                _ => {}
            }
        }
    }
}

/// Counts the bytes read through it.
#[derive(Debug)]
pub struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> CountingReader<R> {
    pub const fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    /// Total bytes returned so far.
    pub const fn count(&self) -> u64 {
        self.count
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// Yields only the bytes of `inner` at or after `offset`.
///
/// Bytes before the offset are read and discarded as they arrive; nothing
/// is buffered.
#[derive(Debug)]
pub struct OffsetReader<R> {
    inner: R,
    offset: u64,
    pos: u64,
}

impl<R: Read> OffsetReader<R> {
    pub const fn new(inner: R, offset: u64) -> Self {
        Self {
            inner,
            offset,
            pos: 0,
        }
    }
}

impl<R: Read> Read for OffsetReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }

            let start = self.pos;
            self.pos += n as u64;
            if self.pos <= self.offset {
                continue;
            }

            let skip = self.offset.saturating_sub(start) as usize;
            if skip > 0 {
                buf.copy_within(skip..n, 0);
            }
            return Ok(n - skip);
        }
    }
}
