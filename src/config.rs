// Codec configuration: word/line wrapping and decode-side skip characters.
//
// A `Config` is immutable once built and is shared through `Arc` by every
// encoder and decoder created from the same codec. Sizes follow the
// convention of the command line: a positive value bounds the axis and
// `-1` leaves it unbounded.

use std::fmt;
use std::sync::Arc;

use crate::charset::CharSet;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Sentinel accepted by the builder for "no limit".
pub const UNBOUNDED: i64 = -1;

pub const DEFAULT_MAX_WORD_SIZE: usize = 8;
pub const DEFAULT_MAX_LINE_SIZE: usize = 160;
pub const DEFAULT_WORD_DELIMITER: &str = "-";

#[cfg(windows)]
pub const DEFAULT_LINE_DELIMITER: &str = "\r\n";
#[cfg(not(windows))]
pub const DEFAULT_LINE_DELIMITER: &str = "\n";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max word size must be positive or -1 (unbounded), got {0}")]
    InvalidWordSize(i64),
    #[error("max line size must be positive or -1 (unbounded), got {0}")]
    InvalidLineSize(i64),
}

// ---------------------------------------------------------------------------
// Skip predicate
// ---------------------------------------------------------------------------

/// Characters a decoder ignores between symbols.
#[derive(Clone, Default)]
pub enum SkipChars {
    /// Unicode whitespace, `-` and `_`.
    #[default]
    Standard,
    /// Skip nothing; every character must be a symbol.
    Nothing,
    Set(CharSet),
    Custom(Arc<dyn Fn(char) -> bool + Send + Sync>),
}

impl SkipChars {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    #[inline]
    pub fn matches(&self, c: char) -> bool {
        match self {
            Self::Standard => c.is_whitespace() || c == '-' || c == '_',
            Self::Nothing => false,
            Self::Set(set) => set.contains(c),
            Self::Custom(f) => f(c),
        }
    }
}

impl fmt::Debug for SkipChars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("Standard"),
            Self::Nothing => f.write_str("Nothing"),
            Self::Set(set) => f.debug_tuple("Set").field(&set.to_string()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for SkipChars {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Standard, Self::Standard) | (Self::Nothing, Self::Nothing) => true,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Validated codec configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    max_word_size: Option<usize>,
    word_delimiter: String,
    max_line_size: Option<usize>,
    line_delimiter: String,
    skip_chars: SkipChars,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_word_size: Some(DEFAULT_MAX_WORD_SIZE),
            word_delimiter: DEFAULT_WORD_DELIMITER.to_string(),
            max_line_size: Some(DEFAULT_MAX_LINE_SIZE),
            line_delimiter: DEFAULT_LINE_DELIMITER.to_string(),
            skip_chars: SkipChars::Standard,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Configuration without word or line wrapping.
    pub fn unlimited() -> Self {
        Self {
            max_word_size: None,
            max_line_size: None,
            ..Self::default()
        }
    }

    /// Start a builder pre-filled with this configuration.
    pub fn to_builder(&self) -> ConfigBuilder {
        ConfigBuilder {
            max_word_size: size_arg(self.max_word_size),
            word_delimiter: self.word_delimiter.clone(),
            max_line_size: size_arg(self.max_line_size),
            line_delimiter: self.line_delimiter.clone(),
            skip_chars: self.skip_chars.clone(),
        }
    }

    /// Maximum characters per word, `None` when unbounded.
    pub fn max_word_size(&self) -> Option<usize> {
        self.max_word_size
    }

    pub fn word_delimiter(&self) -> &str {
        &self.word_delimiter
    }

    /// Maximum characters per line (word delimiters included), `None` when
    /// unbounded.
    pub fn max_line_size(&self) -> Option<usize> {
        self.max_line_size
    }

    pub fn line_delimiter(&self) -> &str {
        &self.line_delimiter
    }

    pub fn skip_chars(&self) -> &SkipChars {
        &self.skip_chars
    }

    #[inline]
    pub fn is_skipped(&self, c: char) -> bool {
        self.skip_chars.matches(c)
    }
}

fn size_arg(size: Option<usize>) -> i64 {
    size.map_or(UNBOUNDED, |s| i64::try_from(s).unwrap_or(i64::MAX))
}

fn validate_size(size: i64, err: fn(i64) -> ConfigError) -> Result<Option<usize>, ConfigError> {
    match size {
        UNBOUNDED => Ok(None),
        s if s > 0 => usize::try_from(s).map(Some).map_err(|_| err(s)),
        s => Err(err(s)),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for `Config`. Sizes are validated by `build()`.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    max_word_size: i64,
    word_delimiter: String,
    max_line_size: i64,
    line_delimiter: String,
    skip_chars: SkipChars,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Config::default().to_builder()
    }
}

impl ConfigBuilder {
    pub fn max_word_size(mut self, size: i64) -> Self {
        self.max_word_size = size;
        self
    }

    pub fn word_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.word_delimiter = delimiter.into();
        self
    }

    pub fn max_line_size(mut self, size: i64) -> Self {
        self.max_line_size = size;
        self
    }

    pub fn line_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.line_delimiter = delimiter.into();
        self
    }

    pub fn skip_chars(mut self, skip: SkipChars) -> Self {
        self.skip_chars = skip;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        Ok(Config {
            max_word_size: validate_size(self.max_word_size, ConfigError::InvalidWordSize)?,
            word_delimiter: self.word_delimiter,
            max_line_size: validate_size(self.max_line_size, ConfigError::InvalidLineSize)?,
            line_delimiter: self.line_delimiter,
            skip_chars: self.skip_chars,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
