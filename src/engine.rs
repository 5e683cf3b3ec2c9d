// Bitspeak codec facade: a format plus a shared configuration.
//
// Provides one-shot conversions built on the block codec:
//   - encode/decode of whole arrays and strings; encoding drains a fixed
//     character chunk into a string reserved from the estimate, decoding
//     grows its buffer when an estimate falls short
//   - stream conversion between any `Read` and `Write`
//   - factories for block encoders/decoders and the stream adapters

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::codec::wrap::max_wrapped_size;
use crate::codec::{DecodeError, Decoder, Encoder, Finish, Format};
use crate::config::Config;
use crate::stream::{CharRead, DecodeReader, EncodeReader, Utf8Chars};

const STREAM_CHUNK: usize = 4096;

// ---------------------------------------------------------------------------
// Bitspeak
// ---------------------------------------------------------------------------

/// A bitspeak format bound to a configuration.
///
/// Cheap to clone; the configuration is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitspeak {
    format: Format,
    config: Arc<Config>,
}

impl Bitspeak {
    pub fn new(format: Format, config: Config) -> Self {
        Self {
            format,
            config: Arc::new(config),
        }
    }

    /// BS-6 with the default configuration.
    pub fn bs6() -> Self {
        Self::new(Format::Bs6, Config::default())
    }

    /// BS-8 with the default configuration.
    pub fn bs8() -> Self {
        Self::new(Format::Bs8, Config::default())
    }

    /// Every supported format with the default configuration.
    pub fn formats() -> [Self; 2] {
        [Self::bs6(), Self::bs8()]
    }

    /// Same format, different configuration.
    pub fn with_config(&self, config: Config) -> Self {
        Self::new(self.format, config)
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Display name of the format, e.g. `BS-6`.
    pub fn name(&self) -> &'static str {
        self.format.name()
    }

    // -- block codec ------------------------------------------------------

    pub fn new_encoder(&self) -> Encoder {
        Encoder::new(self.format, Arc::clone(&self.config))
    }

    pub fn new_decoder(&self) -> Decoder {
        Decoder::new(self.format, Arc::clone(&self.config))
    }

    /// Upper bound on the characters produced for `bytes` input bytes,
    /// word and line delimiters included.
    pub fn estimate_encode_size(&self, bytes: usize) -> usize {
        max_wrapped_size(&self.config, self.format.max_encode_size(bytes))
    }

    /// Upper bound on the bytes produced by decoding `chars` characters.
    pub fn estimate_decode_size(&self, chars: usize) -> usize {
        self.format.max_decode_size(chars)
    }

    // -- whole buffers ----------------------------------------------------

    /// Encode `data` into a string.
    pub fn encode(&self, data: &[u8]) -> String {
        self.encode_with_capacity(data, self.estimate_encode_size(data.len()))
    }

    /// Encode through a fixed character chunk into a string reserved for
    /// `capacity` characters.
    pub(crate) fn encode_with_capacity(&self, data: &[u8], capacity: usize) -> String {
        let mut encoder = self.new_encoder();
        let mut out = String::with_capacity(capacity);
        let mut chunk = ['\0'; STREAM_CHUNK];
        let mut pos = 0;

        while pos < data.len() {
            let before = encoder.read_count();
            let n = encoder.encode_block(&data[pos..], &mut chunk);
            pos += (encoder.read_count() - before) as usize;
            out.extend(&chunk[..n]);
        }
        loop {
            match encoder.finish_block(&mut chunk) {
                Finish::Wrote(n) => out.extend(&chunk[..n]),
                Finish::NeedsCapacity => {}
                Finish::Done => break,
            }
        }
        out
    }

    /// Decode a string.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, DecodeError> {
        let chars: Vec<char> = text.chars().collect();
        self.decode_chars(&chars)
    }

    /// Decode a character slice.
    pub fn decode_chars(&self, chars: &[char]) -> Result<Vec<u8>, DecodeError> {
        self.decode_with_capacity(chars, self.estimate_decode_size(chars.len()))
    }

    pub(crate) fn decode_with_capacity(
        &self,
        chars: &[char],
        capacity: usize,
    ) -> Result<Vec<u8>, DecodeError> {
        let mut decoder = self.new_decoder();
        let mut out = vec![0u8; capacity];
        let mut len = 0;
        let mut pos = 0;

        loop {
            if len == out.len() {
                grow(&mut out);
            }
            if pos < chars.len() {
                let before = decoder.read_count();
                len += decoder.decode_block(&chars[pos..], &mut out[len..])?;
                pos += (decoder.read_count() - before) as usize;
                continue;
            }
            match decoder.finish_block(&mut out[len..])? {
                Finish::Wrote(n) => len += n,
                Finish::NeedsCapacity => {}
                Finish::Done => break,
            }
        }
        out.truncate(len);
        Ok(out)
    }

    // -- streams ----------------------------------------------------------

    /// Adapter producing symbols from the bytes of `input`.
    pub fn encode_reader<R: Read>(&self, input: R) -> EncodeReader<R> {
        EncodeReader::new(input, self.new_encoder())
    }

    /// Adapter producing bytes from the symbols of `input`.
    pub fn decode_reader<C: CharRead>(&self, input: C) -> DecodeReader<C> {
        DecodeReader::new(input, self.new_decoder())
    }

    /// Encode all of `input` and write the symbols to `output` as UTF-8.
    ///
    /// Returns the number of characters written.
    pub fn encode_stream<R: Read, W: Write>(&self, input: R, output: &mut W) -> io::Result<u64> {
        let mut reader = self.encode_reader(input);
        let mut chars = vec!['\0'; STREAM_CHUNK];
        let mut text = String::with_capacity(STREAM_CHUNK);
        let mut total = 0u64;
        loop {
            let n = reader.read_chars(&mut chars)?;
            if n == 0 {
                break;
            }
            text.clear();
            text.extend(&chars[..n]);
            output.write_all(text.as_bytes())?;
            total += n as u64;
        }
        Ok(total)
    }

    /// Decode UTF-8 symbols from `input` and write the bytes to `output`.
    ///
    /// Returns the number of bytes written. Decode failures are reported
    /// as `ErrorKind::InvalidData` carrying the `DecodeError`.
    pub fn decode_stream<R: Read, W: Write>(&self, input: R, output: &mut W) -> io::Result<u64> {
        let mut reader = self.decode_reader(Utf8Chars::new(input));
        io::copy(&mut reader, output)
    }
}

impl fmt::Display for Bitspeak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for Bitspeak {
    fn default() -> Self {
        Self::bs6()
    }
}

fn grow(buf: &mut Vec<u8>) {
    let new_len = buf.len().saturating_mul(2).max(16);
    buf.resize(new_len, 0);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
