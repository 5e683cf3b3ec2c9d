//! Bitspeak: reversible binary-to-text encoding into pronounceable words.
//!
//! Two formats are provided. BS-6 spends six bits per consonant/vowel
//! syllable; BS-8 packs a full byte into each consonant group and vowel
//! group pair. Output is wrapped into words and lines, and decoding skips
//! whitespace and delimiters.
//!
//! The crate provides:
//! - Resumable block encoders and decoders (`codec`)
//! - Validated configuration and skip-character sets (`config`, `charset`)
//! - Reader adapters over the block codec (`stream`)
//! - The `Bitspeak` facade for whole buffers and streams (`engine`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use bitspeak::Bitspeak;
//!
//! let codec = Bitspeak::bs6();
//! let text = codec.encode(&[1, 2, 3]);
//! assert_eq!(text, "pakatape");
//! assert_eq!(codec.decode(&text).unwrap(), [1, 2, 3]);
//! ```

pub mod charset;
pub mod codec;
pub mod config;
pub mod engine;
pub mod io;
pub mod stream;

#[cfg(feature = "cli")]
pub mod cli;

pub use codec::{DecodeError, Format};
pub use config::{Config, ConfigError};
pub use engine::Bitspeak;
