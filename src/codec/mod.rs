// Block codec: resumable encoder/decoder state machines for BS-6 and BS-8.
//
// Layout:
//   - tables: symbol alphabets and reverse lookups
//   - bits: MSB-first bit accumulator
//   - wrap: word/line delimiter policy used by the encoders
//   - encoder / decoder: one state machine per format behind a common type
//
// Every block call works on caller-provided slices, consumes as much input
// as it can and reports progress through `read_count()` / `write_count()`.

pub mod bits;
pub mod decoder;
pub mod encoder;
pub mod tables;
pub mod wrap;

use std::fmt;
use std::str::FromStr;

pub use decoder::{DecodeError, Decoder, Expected, Misalignment};
pub use encoder::Encoder;

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// Symbol format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Six bits per consonant/vowel pair, one character per symbol.
    Bs6,
    /// One byte per consonant/vowel pair, one or two characters per symbol.
    Bs8,
}

impl Format {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bs6 => "BS-6",
            Self::Bs8 => "BS-8",
        }
    }

    /// Upper bound on the symbol characters produced for `bytes` input
    /// bytes, not counting delimiters.
    pub const fn max_encode_size(self, bytes: usize) -> usize {
        match self {
            Self::Bs6 => match bytes.checked_mul(8) {
                Some(bits) => {
                    let pairs = (bits / 6).saturating_mul(2);
                    pairs.saturating_add((bits % 6 != 0) as usize)
                }
                None => usize::MAX,
            },
            Self::Bs8 => bytes.saturating_mul(4),
        }
    }

    /// Upper bound on the bytes produced by decoding `chars` characters.
    pub const fn max_decode_size(self, chars: usize) -> usize {
        match self {
            Self::Bs6 => {
                let tail = if chars % 2 == 1 { 4 } else { 0 };
                match (chars / 2).checked_mul(6) {
                    Some(bits) => match bits.checked_add(tail) {
                        Some(bits) => bits.div_ceil(8),
                        None => usize::MAX,
                    },
                    None => usize::MAX,
                }
            }
            Self::Bs8 => chars.div_ceil(2),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse '{0}' as a bitspeak format (expected bs6 or bs8)")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bs6" | "bs-6" => Ok(Self::Bs6),
            "bs8" | "bs-8" => Ok(Self::Bs8),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Finish
// ---------------------------------------------------------------------------

/// Progress reported by `finish_block()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// Wrote this many units; call again.
    Wrote(usize),
    /// Output is pending but the destination had no room.
    NeedsCapacity,
    /// Nothing left; the stream is complete.
    Done,
}

impl Finish {
    pub(crate) fn from_progress(written: usize, exhausted: bool) -> Self {
        if written > 0 {
            Self::Wrote(written)
        } else if exhausted {
            Self::Done
        } else {
            Self::NeedsCapacity
        }
    }
}
