// Streaming decoder: a `CharRead` of symbols in, `std::io::Read` of bytes out.

use std::io::{self, Read};

use log::trace;

use super::DEFAULT_STAGING_SIZE;
use super::chars::CharRead;
use crate::codec::{DecodeError, Decoder, Finish};

fn invalid_data(err: DecodeError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

/// Decodes characters pulled from `inner` on demand.
///
/// Decode failures surface as `ErrorKind::InvalidData` wrapping the
/// `DecodeError`.
#[derive(Debug)]
pub struct DecodeReader<C> {
    inner: C,
    decoder: Decoder,
    staging: Box<[char]>,
    pos: usize,
    len: usize,
    eof: bool,
    done: bool,
}

impl<C: CharRead> DecodeReader<C> {
    pub fn new(inner: C, decoder: Decoder) -> Self {
        Self::build(inner, decoder, DEFAULT_STAGING_SIZE)
    }

    /// Use a staging buffer of `capacity` characters (at least 1).
    pub fn with_capacity(capacity: usize, inner: C, decoder: Decoder) -> io::Result<Self> {
        if capacity == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "staging buffer must hold at least one character",
            ));
        }
        Ok(Self::build(inner, decoder, capacity))
    }

    fn build(inner: C, decoder: Decoder, capacity: usize) -> Self {
        Self {
            inner,
            decoder,
            staging: vec!['\0'; capacity].into_boxed_slice(),
            pos: 0,
            len: 0,
            eof: false,
            done: false,
        }
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn fill(&mut self) -> io::Result<()> {
        self.pos = 0;
        self.len = self.inner.read_chars(&mut self.staging)?;
        if self.len == 0 {
            trace!(
                "decode input exhausted after {} chars",
                self.decoder.read_count()
            );
            self.eof = true;
        }
        Ok(())
    }
}

impl<C: CharRead> Read for DecodeReader<C> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() || self.done {
            return Ok(0);
        }
        loop {
            if self.pos == self.len && !self.eof {
                self.fill()?;
            }
            if self.pos < self.len {
                let before = self.decoder.read_count();
                let written = self
                    .decoder
                    .decode_block(&self.staging[self.pos..self.len], out)
                    .map_err(invalid_data)?;
                self.pos += (self.decoder.read_count() - before) as usize;
                if written > 0 {
                    return Ok(written);
                }
                continue;
            }
            return match self.decoder.finish_block(out).map_err(invalid_data)? {
                Finish::Wrote(n) => Ok(n),
                Finish::Done => {
                    trace!("decoder finished, {} bytes", self.decoder.write_count());
                    self.done = true;
                    Ok(0)
                }
                Finish::NeedsCapacity => Err(io::Error::other("decoder made no progress")),
            };
        }
    }
}
