// Resumable decoders.
//
// `decode_block()` consumes characters until the source is exhausted or
// the destination is full, skipping configured separator characters.
// `finish_block()` resolves a trailing BS-8 vowel, drains the accumulator
// and checks that whatever remains is padding.
//
// A decoder that returned an error keeps returning it.

use std::fmt;
use std::sync::Arc;

use log::debug;

use super::bits::BitAccumulator;
use super::tables::{self, BS6_CONSONANT_BITS, BS6_VOWEL_BITS};
use super::{Finish, Format};
use crate::config::Config;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// What the decoder was looking for when it hit an illegal character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Consonant,
    Vowel,
    /// The `h` of the BS-8 consonant `ch`.
    ConsonantTail,
    /// Second character of a BS-8 vowel starting with the given prefix.
    VowelTail(char),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consonant => f.write_str("a consonant"),
            Self::Vowel => f.write_str("a vowel"),
            Self::ConsonantTail => f.write_str("'h' after 'c'"),
            Self::VowelTail(prefix) => write!(f, "a vowel continuing '{prefix}'"),
        }
    }
}

/// End of input that does not fall on a symbol boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Misalignment {
    #[error("{bits} trailing bits are not zero padding")]
    NonZeroPadding { bits: u32 },
    #[error("{bits} bits left over at end of input")]
    LeftoverBits { bits: u32 },
    #[error("expected \"ch\", got \"c\" at end of input")]
    DanglingC,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// `offset` counts every character the decoder has been given,
    /// skipped characters included.
    #[error("illegal character {found:?} at offset {offset}, expected {expected}")]
    IllegalSymbol {
        offset: u64,
        found: char,
        expected: Expected,
    },
    #[error("misaligned input: {0}")]
    Misaligned(Misalignment),
}

fn illegal(offset: u64, found: char, expected: Expected) -> DecodeError {
    DecodeError::IllegalSymbol {
        offset,
        found,
        expected,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Consonant,
    Vowel,
}

// ---------------------------------------------------------------------------
// BS-6
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct SixBitDecoder {
    bits: BitAccumulator,
    role: Role,
}

impl SixBitDecoder {
    fn new() -> Self {
        Self {
            bits: BitAccumulator::new(),
            role: Role::Consonant,
        }
    }

    fn decode(
        &mut self,
        config: &Config,
        base: u64,
        src: &[char],
        dst: &mut [u8],
    ) -> Result<(usize, usize), DecodeError> {
        let mut read = 0;
        let mut written = 0;

        while read < src.len() && written < dst.len() {
            let c = src[read];
            if config.is_skipped(c) {
                read += 1;
                continue;
            }
            let offset = base + read as u64;
            match self.role {
                Role::Consonant => {
                    let value = tables::bs6_consonant(c)
                        .ok_or_else(|| illegal(offset, c, Expected::Consonant))?;
                    self.bits.push(value as u32, BS6_CONSONANT_BITS);
                    self.role = Role::Vowel;
                }
                Role::Vowel => {
                    let value =
                        tables::bs6_vowel(c).ok_or_else(|| illegal(offset, c, Expected::Vowel))?;
                    self.bits.push(value as u32, BS6_VOWEL_BITS);
                    self.role = Role::Consonant;
                }
            }
            written += self.bits.flush(&mut dst[written..]);
            read += 1;
        }
        Ok((read, written))
    }

    fn finish(&mut self, dst: &mut [u8]) -> Result<(usize, bool), DecodeError> {
        let written = self.bits.flush(dst);
        let left = self.bits.len();
        if left > 0 && left < 8 {
            if self.bits.value() != 0 {
                return Err(DecodeError::Misaligned(Misalignment::NonZeroPadding {
                    bits: left,
                }));
            }
            self.bits.clear();
        }
        Ok((written, self.bits.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// BS-8
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EightBitState {
    Consonant,
    /// Saw `c`, need `h`.
    ConsonantTail,
    Vowel,
    /// Saw a vowel prefix; the next character either completes a digraph
    /// or starts the next consonant.
    VowelTail { prefix: char, bare: u8 },
}

#[derive(Debug, Clone)]
struct EightBitDecoder {
    bits: BitAccumulator,
    state: EightBitState,
}

impl EightBitDecoder {
    fn new() -> Self {
        Self {
            bits: BitAccumulator::new(),
            state: EightBitState::Consonant,
        }
    }

    fn decode(
        &mut self,
        config: &Config,
        base: u64,
        src: &[char],
        dst: &mut [u8],
    ) -> Result<(usize, usize), DecodeError> {
        let mut read = 0;
        let mut written = 0;

        while read < src.len() && written < dst.len() {
            let c = src[read];
            if config.is_skipped(c) {
                read += 1;
                continue;
            }
            let offset = base + read as u64;
            let mut consumed = true;

            match self.state {
                EightBitState::Consonant => {
                    if c == 'c' {
                        self.state = EightBitState::ConsonantTail;
                    } else {
                        let value = tables::bs8_consonant(c)
                            .ok_or_else(|| illegal(offset, c, Expected::Consonant))?;
                        self.bits.push(value as u32, 4);
                        self.state = EightBitState::Vowel;
                    }
                }
                EightBitState::ConsonantTail => {
                    if c != 'h' {
                        return Err(illegal(offset, c, Expected::ConsonantTail));
                    }
                    self.bits.push(tables::BS8_CH as u32, 4);
                    self.state = EightBitState::Vowel;
                }
                EightBitState::Vowel => {
                    let bare = tables::bs8_vowel_prefix(c)
                        .ok_or_else(|| illegal(offset, c, Expected::Vowel))?;
                    self.state = EightBitState::VowelTail { prefix: c, bare };
                }
                EightBitState::VowelTail { prefix, bare } => {
                    match tables::bs8_vowel_pair(prefix, c) {
                        Some(value) => self.bits.push(value as u32, 4),
                        None if tables::is_bs8_vowel_suffix(c) => {
                            return Err(illegal(offset, c, Expected::VowelTail(prefix)));
                        }
                        None => {
                            // Bare vowel; `c` starts the next consonant.
                            self.bits.push(bare as u32, 4);
                            consumed = false;
                        }
                    }
                    self.state = EightBitState::Consonant;
                }
            }
            written += self.bits.flush(&mut dst[written..]);
            if consumed {
                read += 1;
            }
        }
        Ok((read, written))
    }

    fn finish(&mut self, dst: &mut [u8]) -> Result<(usize, bool), DecodeError> {
        match self.state {
            EightBitState::ConsonantTail => {
                return Err(DecodeError::Misaligned(Misalignment::DanglingC));
            }
            EightBitState::VowelTail { bare, .. } => {
                self.bits.push(bare as u32, 4);
                self.state = EightBitState::Consonant;
            }
            EightBitState::Consonant | EightBitState::Vowel => {}
        }
        let written = self.bits.flush(dst);
        let left = self.bits.len();
        if left > 0 && left < 8 {
            return Err(DecodeError::Misaligned(Misalignment::LeftoverBits {
                bits: left,
            }));
        }
        Ok((written, left == 0))
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Machine {
    SixBit(SixBitDecoder),
    EightBit(EightBitDecoder),
}

/// Stateful symbols-to-bytes decoder for one stream.
#[derive(Debug, Clone)]
pub struct Decoder {
    machine: Machine,
    config: Arc<Config>,
    read_count: u64,
    write_count: u64,
    failure: Option<DecodeError>,
}

impl Decoder {
    pub fn new(format: Format, config: Arc<Config>) -> Self {
        debug!("new {format} decoder (skip={:?})", config.skip_chars());
        let machine = match format {
            Format::Bs6 => Machine::SixBit(SixBitDecoder::new()),
            Format::Bs8 => Machine::EightBit(EightBitDecoder::new()),
        };
        Self {
            machine,
            config,
            read_count: 0,
            write_count: 0,
            failure: None,
        }
    }

    pub fn format(&self) -> Format {
        match self.machine {
            Machine::SixBit(_) => Format::Bs6,
            Machine::EightBit(_) => Format::Bs8,
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Decode characters from `src` into `dst`.
    ///
    /// Returns the number of bytes written. Characters consumed (skipped
    /// ones included) show up as the increase of `read_count()`.
    pub fn decode_block(&mut self, src: &[char], dst: &mut [u8]) -> Result<usize, DecodeError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let base = self.read_count;
        let result = match &mut self.machine {
            Machine::SixBit(m) => m.decode(&self.config, base, src, dst),
            Machine::EightBit(m) => m.decode(&self.config, base, src, dst),
        };
        let (read, written) = self.record(result)?;
        self.read_count += read as u64;
        self.write_count += written as u64;
        Ok(written)
    }

    /// Drain buffered bits after the last `decode_block()`. Call until it
    /// returns `Finish::Done`.
    pub fn finish_block(&mut self, dst: &mut [u8]) -> Result<Finish, DecodeError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let result = match &mut self.machine {
            Machine::SixBit(m) => m.finish(dst),
            Machine::EightBit(m) => m.finish(dst),
        };
        let (written, done) = self.record(result)?;
        self.write_count += written as u64;
        Ok(Finish::from_progress(written, done))
    }

    fn record<T>(&mut self, result: Result<T, DecodeError>) -> Result<T, DecodeError> {
        if let Err(err) = &result {
            debug!("{} decode failed: {err}", self.format());
            self.failure = Some(err.clone());
        }
        result
    }

    /// Total characters consumed.
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// Total bytes produced.
    pub fn write_count(&self) -> u64 {
        self.write_count
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
