// Word and line wrapping for encoder output.
//
// The encoders ask for permission before every symbol. A refusal arms a
// pending delimiter which the encoder drains with `write_delimiter()`,
// possibly across several block calls, before asking again. Word
// delimiter characters count toward the line length; line delimiters
// reset both counters.

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    Word,
    Line,
}

/// Tracks the current word and line length of one encoder.
#[derive(Debug, Clone)]
pub struct LineWrapper {
    max_word: Option<usize>,
    max_line: Option<usize>,
    word_delimiter: Box<[char]>,
    line_delimiter: Box<[char]>,
    word_len: usize,
    line_len: usize,
    pending: Pending,
    position: usize,
}

impl LineWrapper {
    pub fn new(config: &Config) -> Self {
        Self {
            max_word: config.max_word_size(),
            max_line: config.max_line_size(),
            word_delimiter: config.word_delimiter().chars().collect(),
            line_delimiter: config.line_delimiter().chars().collect(),
            word_len: 0,
            line_len: 0,
            pending: Pending::None,
            position: 0,
        }
    }

    /// Request room for `wanted` symbol characters.
    ///
    /// Returns how many may be written now. Zero means a delimiter is
    /// pending and must be written first. A word (or line) that has not
    /// started yet is split rather than refused, so a symbol wider than
    /// the limit still makes progress.
    pub fn begin_output(&mut self, wanted: usize) -> usize {
        if self.pending != Pending::None {
            return 0;
        }
        let mut granted = wanted;
        let mut next = Pending::None;

        if let Some(max) = self.max_word
            && self.word_len + wanted > max
        {
            if self.word_len == 0 {
                granted = wanted.min(max);
            } else {
                granted = 0;
                next = Pending::Word;
            }
        }
        if let Some(max) = self.max_line
            && self.line_len + granted > max
        {
            if self.line_len == 0 {
                granted = granted.min(max);
            } else {
                granted = 0;
                next = Pending::Line;
            }
        }

        self.word_len += granted;
        self.line_len += granted;
        self.pending = next;
        granted
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending != Pending::None
    }

    /// Copy as much of the pending delimiter as fits into `dst`.
    ///
    /// Returns the number of characters written. The delimiter is complete
    /// (and `is_pending()` false) once its last character has been copied;
    /// an empty delimiter completes without writing anything.
    pub fn write_delimiter(&mut self, dst: &mut [char]) -> usize {
        let delimiter: &[char] = match self.pending {
            Pending::None => return 0,
            Pending::Word => &self.word_delimiter,
            Pending::Line => &self.line_delimiter,
        };
        let total = delimiter.len();
        let n = (total - self.position).min(dst.len());
        dst[..n].copy_from_slice(&delimiter[self.position..self.position + n]);

        if self.pending == Pending::Word {
            self.line_len += n;
        }
        self.position += n;

        if self.position >= total {
            if self.pending == Pending::Line {
                self.line_len = 0;
            }
            self.word_len = 0;
            self.position = 0;
            self.pending = Pending::None;
        }
        n
    }
}

/// Upper bound on the output length once `chars` symbol characters have
/// been wrapped according to `config`.
///
/// A word closes with at least `max_word - 1` characters (a two-character
/// symbol may not fit the last slot), and likewise for lines, so this never
/// under-estimates.
pub fn max_wrapped_size(config: &Config, chars: usize) -> usize {
    let with_words = match config.max_word_size() {
        Some(max) => {
            let words = chars / max.saturating_sub(1).max(1);
            chars.saturating_add(words.saturating_mul(config.word_delimiter().chars().count()))
        }
        None => chars,
    };
    match config.max_line_size() {
        Some(max) => {
            let lines = with_words / max.saturating_sub(1).max(1);
            with_words.saturating_add(lines.saturating_mul(config.line_delimiter().chars().count()))
        }
        None => with_words,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
