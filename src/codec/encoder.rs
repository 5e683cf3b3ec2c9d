// Resumable encoders.
//
// `encode_block()` turns as many source bytes as fit into symbol
// characters and keeps any partial state (buffered bits, half-written
// BS-8 symbols, half-written delimiters) for the next call.
// `finish_block()` drains that state once the input has ended.

use std::sync::Arc;

use log::debug;

use super::bits::BitAccumulator;
use super::tables::{
    BS6_CONSONANT_BITS, BS6_CONSONANTS, BS6_VOWEL_BITS, BS6_VOWELS, BS8_CONSONANTS, BS8_VOWELS,
};
use super::wrap::LineWrapper;
use super::{Finish, Format};
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Consonant,
    Vowel,
}

// ---------------------------------------------------------------------------
// BS-6
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct SixBitEncoder {
    bits: BitAccumulator,
    role: Role,
    wrap: LineWrapper,
}

impl SixBitEncoder {
    fn new(config: &Config) -> Self {
        Self {
            bits: BitAccumulator::new(),
            role: Role::Consonant,
            wrap: LineWrapper::new(config),
        }
    }

    #[inline]
    fn emit(&mut self) -> char {
        match self.role {
            Role::Consonant => {
                self.role = Role::Vowel;
                BS6_CONSONANTS[self.bits.take(BS6_CONSONANT_BITS) as usize]
            }
            Role::Vowel => {
                self.role = Role::Consonant;
                BS6_VOWELS[self.bits.take(BS6_VOWEL_BITS) as usize]
            }
        }
    }

    #[inline]
    fn width(&self) -> u32 {
        match self.role {
            Role::Consonant => BS6_CONSONANT_BITS,
            Role::Vowel => BS6_VOWEL_BITS,
        }
    }

    /// Returns (bytes read, characters written).
    fn encode(&mut self, src: &[u8], dst: &mut [char]) -> (usize, usize) {
        let mut read = 0;
        let mut written = 0;

        while written < dst.len() {
            if self.wrap.is_pending() {
                written += self.wrap.write_delimiter(&mut dst[written..]);
                continue;
            }
            if self.bits.len() < self.width() {
                let Some(&byte) = src.get(read) else {
                    break;
                };
                self.bits.push(byte as u32, 8);
                read += 1;
            }
            if self.wrap.begin_output(1) == 0 {
                continue;
            }
            dst[written] = self.emit();
            written += 1;
        }
        (read, written)
    }

    fn finish(&mut self, dst: &mut [char]) -> (usize, bool) {
        let mut written = 0;

        while written < dst.len() && !self.bits.is_empty() {
            if self.wrap.is_pending() {
                written += self.wrap.write_delimiter(&mut dst[written..]);
                continue;
            }
            if self.wrap.begin_output(1) == 0 {
                continue;
            }
            if self.role == Role::Consonant && self.bits.len() < BS6_CONSONANT_BITS {
                self.bits.pad(BS6_CONSONANT_BITS - self.bits.len());
            }
            dst[written] = self.emit();
            written += 1;
        }
        (written, self.bits.is_empty())
    }
}

// ---------------------------------------------------------------------------
// BS-8
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EightBitState {
    ReadByte,
    /// `offset` characters of the current symbol are already out.
    Symbol { role: Role, offset: usize },
}

#[derive(Debug, Clone)]
struct EightBitEncoder {
    state: EightBitState,
    byte: u8,
    /// Characters of the current symbol already cleared by the wrapper.
    granted: usize,
    wrap: LineWrapper,
}

impl EightBitEncoder {
    fn new(config: &Config) -> Self {
        Self {
            state: EightBitState::ReadByte,
            byte: 0,
            granted: 0,
            wrap: LineWrapper::new(config),
        }
    }

    fn symbol(&self, role: Role) -> &'static [u8] {
        match role {
            Role::Consonant => BS8_CONSONANTS[(self.byte >> 4) as usize].as_bytes(),
            Role::Vowel => BS8_VOWELS[(self.byte & 0xF) as usize].as_bytes(),
        }
    }

    /// Shared by block and finish calls; `src` is empty when finishing.
    fn encode(&mut self, src: &[u8], dst: &mut [char]) -> (usize, usize) {
        let mut read = 0;
        let mut written = 0;

        while written < dst.len() {
            if self.wrap.is_pending() {
                written += self.wrap.write_delimiter(&mut dst[written..]);
                continue;
            }
            let (role, offset) = match self.state {
                EightBitState::Symbol { role, offset } => (role, offset),
                EightBitState::ReadByte => {
                    let Some(&byte) = src.get(read) else {
                        break;
                    };
                    read += 1;
                    self.byte = byte;
                    self.state = EightBitState::Symbol {
                        role: Role::Consonant,
                        offset: 0,
                    };
                    (Role::Consonant, 0)
                }
            };
            let symbol = self.symbol(role);

            // Ask for the rest of the symbol at once so digraphs stay whole
            // unless the word is too short to ever hold them.
            if self.granted == 0 {
                self.granted = self.wrap.begin_output(symbol.len() - offset);
                if self.granted == 0 {
                    continue;
                }
            }
            dst[written] = symbol[offset] as char;
            written += 1;
            self.granted -= 1;

            self.state = if offset + 1 < symbol.len() {
                EightBitState::Symbol {
                    role,
                    offset: offset + 1,
                }
            } else {
                match role {
                    Role::Consonant => EightBitState::Symbol {
                        role: Role::Vowel,
                        offset: 0,
                    },
                    Role::Vowel => EightBitState::ReadByte,
                }
            };
        }
        (read, written)
    }

    fn finish(&mut self, dst: &mut [char]) -> (usize, bool) {
        let (_, written) = self.encode(&[], dst);
        let done = self.state == EightBitState::ReadByte && !self.wrap.is_pending();
        (written, done)
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Machine {
    SixBit(SixBitEncoder),
    EightBit(EightBitEncoder),
}

/// Stateful bytes-to-symbols encoder for one stream.
#[derive(Debug, Clone)]
pub struct Encoder {
    machine: Machine,
    config: Arc<Config>,
    read_count: u64,
    write_count: u64,
}

impl Encoder {
    pub fn new(format: Format, config: Arc<Config>) -> Self {
        debug!(
            "new {format} encoder (word={:?}, line={:?})",
            config.max_word_size(),
            config.max_line_size()
        );
        let machine = match format {
            Format::Bs6 => Machine::SixBit(SixBitEncoder::new(&config)),
            Format::Bs8 => Machine::EightBit(EightBitEncoder::new(&config)),
        };
        Self {
            machine,
            config,
            read_count: 0,
            write_count: 0,
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

    /// Encode bytes from `src` into `dst`.
    ///
    /// Returns the number of characters written. The number of bytes
    /// consumed is the increase of `read_count()`; unconsumed bytes must be
    /// passed again on the next call.
    pub fn encode_block(&mut self, src: &[u8], dst: &mut [char]) -> usize {
        let (read, written) = match &mut self.machine {
            Machine::SixBit(m) => m.encode(src, dst),
            Machine::EightBit(m) => m.encode(src, dst),
        };
        self.read_count += read as u64;
        self.write_count += written as u64;
        written
    }

    /// Flush buffered state after the last `encode_block()`. Call until it
    /// returns `Finish::Done`.
    pub fn finish_block(&mut self, dst: &mut [char]) -> Finish {
        let (written, done) = match &mut self.machine {
            Machine::SixBit(m) => m.finish(dst),
            Machine::EightBit(m) => m.finish(dst),
        };
        self.write_count += written as u64;
        Finish::from_progress(written, done)
    }

    /// Total bytes consumed.
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// Total characters produced, delimiters included.
    pub fn write_count(&self) -> u64 {
        self.write_count
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
