// Streaming encoder: a `Read` of bytes in, a `CharRead` of symbols out.

use std::io::{self, Read};

use log::trace;

use super::DEFAULT_STAGING_SIZE;
use super::chars::CharRead;
use crate::codec::{Encoder, Finish};

/// Encodes bytes pulled from `inner` on demand.
///
/// Input is staged in a fixed buffer; each `read_chars()` call either
/// encodes staged bytes or, once `inner` is exhausted, drains the encoder.
#[derive(Debug)]
pub struct EncodeReader<R> {
    inner: R,
    encoder: Encoder,
    staging: Box<[u8]>,
    pos: usize,
    len: usize,
    eof: bool,
    done: bool,
}

impl<R: Read> EncodeReader<R> {
    pub fn new(inner: R, encoder: Encoder) -> Self {
        Self::build(inner, encoder, DEFAULT_STAGING_SIZE)
    }

    /// Use a staging buffer of `capacity` bytes (at least 1).
    pub fn with_capacity(capacity: usize, inner: R, encoder: Encoder) -> io::Result<Self> {
        if capacity == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "staging buffer must hold at least one byte",
            ));
        }
        Ok(Self::build(inner, encoder, capacity))
    }

    fn build(inner: R, encoder: Encoder, capacity: usize) -> Self {
        Self {
            inner,
            encoder,
            staging: vec![0u8; capacity].into_boxed_slice(),
            pos: 0,
            len: 0,
            eof: false,
            done: false,
        }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> io::Result<()> {
        self.pos = 0;
        self.len = loop {
            match self.inner.read(&mut self.staging) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other?,
            }
        };
        if self.len == 0 {
            trace!(
                "encode input exhausted after {} bytes",
                self.encoder.read_count()
            );
            self.eof = true;
        }
        Ok(())
    }
}

impl<R: Read> CharRead for EncodeReader<R> {
    fn read_chars(&mut self, out: &mut [char]) -> io::Result<usize> {
        if out.is_empty() || self.done {
            return Ok(0);
        }
        loop {
            if self.pos == self.len && !self.eof {
                self.fill()?;
            }
            if self.pos < self.len {
                let before = self.encoder.read_count();
                let written = self
                    .encoder
                    .encode_block(&self.staging[self.pos..self.len], out);
                self.pos += (self.encoder.read_count() - before) as usize;
                if written > 0 {
                    return Ok(written);
                }
                // Everything staged was absorbed into encoder state.
                continue;
            }
            return match self.encoder.finish_block(out) {
                Finish::Wrote(n) => Ok(n),
                Finish::Done => {
                    trace!("encoder finished, {} chars", self.encoder.write_count());
                    self.done = true;
                    Ok(0)
                }
                Finish::NeedsCapacity => Err(io::Error::other("encoder made no progress")),
            };
        }
    }
}
