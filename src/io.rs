// File-level I/O helpers for bitspeak encoding/decoding.
//
// Provides `encode_file()` and `decode_file()` convenience functions that
// run the stream adapters over buffered files. Optionally computes
// streaming SHA-256 checksums of the raw bytes (feature-gated behind
// `file-io`), so an encode/decode pair can be verified end to end.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::codec::DecodeError;
use crate::engine::Bitspeak;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `encode_file()`.
#[derive(Debug, Clone)]
pub struct EncodeStats {
    /// Raw input size in bytes.
    pub input_size: u64,
    /// Symbol characters written, delimiters included.
    pub chars: u64,
    /// Encoded output size in bytes (UTF-8).
    pub output_size: u64,
    /// SHA-256 of the raw input (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `decode_file()`.
#[derive(Debug, Clone)]
pub struct DecodeStats {
    /// Encoded input size in bytes.
    pub input_size: u64,
    /// Decoded output size in bytes.
    pub output_size: u64,
    /// SHA-256 of the decoded output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// I/O error (file open, read, write, invalid UTF-8).
    #[error("I/O error: {0}")]
    Io(io::Error),
    /// Malformed symbol stream.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl From<io::Error> for IoError {
    /// Unwraps decode failures that the stream adapters carried inside an
    /// `io::Error`.
    fn from(err: io::Error) -> Self {
        if !err.get_ref().is_some_and(|inner| inner.is::<DecodeError>()) {
            return Self::Io(err);
        }
        match err.into_inner().map(|inner| inner.downcast::<DecodeError>()) {
            Some(Ok(decode)) => Self::Decode(*decode),
            Some(Err(other)) => Self::Io(io::Error::new(io::ErrorKind::InvalidData, other)),
            None => Self::Io(io::ErrorKind::InvalidData.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// encode_file
// ---------------------------------------------------------------------------

/// Encode the bytes of `input_path` as bitspeak text written to `output_path`.
///
/// When the `file-io` feature is enabled, a SHA-256 checksum of the input
/// is computed as it streams through the encoder.
pub fn encode_file(
    codec: &Bitspeak,
    input_path: &Path,
    output_path: &Path,
) -> Result<EncodeStats, IoError> {
    let input_file = File::open(input_path)?;
    let input_size = input_file.metadata()?.len();
    let reader = BufReader::with_capacity(BUF_SIZE, input_file);

    let output_file = File::create(output_path)?;
    let mut writer = BufWriter::with_capacity(BUF_SIZE, output_file);

    #[cfg(feature = "file-io")]
    let mut hasher = sha2::Sha256::new();

    #[cfg(feature = "file-io")]
    let chars = codec.encode_stream(
        HashingReader {
            inner: reader,
            hasher: &mut hasher,
        },
        &mut writer,
    )?;
    #[cfg(not(feature = "file-io"))]
    let chars = codec.encode_stream(reader, &mut writer)?;

    let output_size = writer
        .into_inner()
        .map_err(|e| e.into_error())?
        .metadata()?
        .len();

    #[cfg(feature = "file-io")]
    let input_sha256 = Some(hasher.finalize().into());
    #[cfg(not(feature = "file-io"))]
    let input_sha256: Option<[u8; 32]> = None;

    Ok(EncodeStats {
        input_size,
        chars,
        output_size,
        input_sha256,
    })
}

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Decode the bitspeak text in `input_path`, writing raw bytes to
/// `output_path`.
///
/// When the `file-io` feature is enabled, a SHA-256 checksum of the output
/// is computed incrementally.
pub fn decode_file(
    codec: &Bitspeak,
    input_path: &Path,
    output_path: &Path,
) -> Result<DecodeStats, IoError> {
    let input_file = File::open(input_path)?;
    let input_size = input_file.metadata()?.len();
    let reader = BufReader::with_capacity(BUF_SIZE, input_file);

    let output_file = File::create(output_path)?;
    let mut output_writer = BufWriter::with_capacity(BUF_SIZE, output_file);

    #[cfg(feature = "file-io")]
    let mut output_hasher = sha2::Sha256::new();

    #[cfg(feature = "file-io")]
    let output_size = {
        let mut hashing_writer = HashingWriter {
            inner: &mut output_writer,
            hasher: &mut output_hasher,
        };
        codec.decode_stream(reader, &mut hashing_writer)?
    };

    #[cfg(not(feature = "file-io"))]
    let output_size = codec.decode_stream(reader, &mut output_writer)?;

    output_writer.flush()?;

    #[cfg(feature = "file-io")]
    let output_sha256 = Some(output_hasher.finalize().into());
    #[cfg(not(feature = "file-io"))]
    let output_sha256: Option<[u8; 32]> = None;

    Ok(DecodeStats {
        input_size,
        output_size,
        output_sha256,
    })
}

// ---------------------------------------------------------------------------
// Hashing adapters (used with file-io feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
struct HashingReader<'a, R: Read> {
    inner: R,
    hasher: &'a mut sha2::Sha256,
}

#[cfg(feature = "file-io")]
impl<R: Read> Read for HashingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

#[cfg(feature = "file-io")]
struct HashingWriter<'a, W: Write> {
    inner: &'a mut W,
    hasher: &'a mut sha2::Sha256,
}

#[cfg(feature = "file-io")]
impl<W: Write> Write for HashingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
