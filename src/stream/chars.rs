// Character sources for the decode side.
//
// `CharRead` is the character counterpart of `std::io::Read`: fill a
// buffer with `char`s, return 0 at end of input. `Utf8Chars` decodes a
// byte stream incrementally; `StrChars` walks an in-memory string.

use std::io::{self, Read};

use log::trace;

/// Pull-based source of characters.
pub trait CharRead {
    /// Read characters into `buf`, returning how many were stored.
    /// `Ok(0)` for a non-empty `buf` means end of input.
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize>;
}

impl<C: CharRead + ?Sized> CharRead for &mut C {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        (**self).read_chars(buf)
    }
}

// ---------------------------------------------------------------------------
// StrChars
// ---------------------------------------------------------------------------

/// Characters of a borrowed string.
#[derive(Debug, Clone)]
pub struct StrChars<'a> {
    chars: std::str::Chars<'a>,
}

impl<'a> StrChars<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
        }
    }
}

impl CharRead for StrChars<'_> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            let Some(c) = self.chars.next() else { break };
            buf[n] = c;
            n += 1;
        }
        Ok(n)
    }
}

// ---------------------------------------------------------------------------
// Utf8Chars
// ---------------------------------------------------------------------------

const UTF8_BUF_SIZE: usize = 8 * 1024;

/// Incremental UTF-8 decoder over any byte reader.
///
/// Sequences split across reads are reassembled; invalid or truncated
/// UTF-8 fails with `ErrorKind::InvalidData`.
#[derive(Debug)]
pub struct Utf8Chars<R> {
    inner: R,
    buf: Box<[u8]>,
    start: usize,
    // `buf[start..valid_end]` is known to be complete, valid UTF-8.
    valid_end: usize,
    end: usize,
    eof: bool,
}

impl<R: Read> Utf8Chars<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; UTF8_BUF_SIZE].into_boxed_slice(),
            start: 0,
            valid_end: 0,
            end: 0,
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn refill(&mut self) -> io::Result<()> {
        self.buf.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.valid_end -= self.start;
        self.start = 0;
        loop {
            match self.inner.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    trace!("utf-8 source exhausted");
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Extend the validated region over the pending bytes.
    fn validate(&mut self) -> io::Result<()> {
        let valid = match std::str::from_utf8(&self.buf[self.valid_end..self.end]) {
            Ok(s) => s.len(),
            Err(e) if e.valid_up_to() > 0 => e.valid_up_to(),
            Err(e) if e.error_len().is_some() => {
                return Err(invalid_utf8("invalid UTF-8 sequence"));
            }
            // Incomplete sequence at the start; need more bytes.
            Err(_) => 0,
        };
        self.valid_end += valid;
        Ok(())
    }

    /// Copy validated characters into `out`, looking at no more bytes than
    /// `out` can hold.
    fn take_valid(&mut self, out: &mut [char]) -> io::Result<usize> {
        let mut limit = self
            .valid_end
            .min(self.start.saturating_add(out.len().saturating_mul(4)));
        while limit < self.valid_end && is_continuation(self.buf[limit]) {
            limit -= 1;
        }
        let window = std::str::from_utf8(&self.buf[self.start..limit])
            .map_err(|_| invalid_utf8("invalid UTF-8"))?;

        let mut n = 0;
        let mut consumed = 0;
        for (i, c) in window.char_indices() {
            if n == out.len() {
                break;
            }
            out[n] = c;
            n += 1;
            consumed = i + c.len_utf8();
        }
        self.start += consumed;
        Ok(n)
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

fn invalid_utf8(detail: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, detail.to_string())
}

impl<R: Read> CharRead for Utf8Chars<R> {
    fn read_chars(&mut self, out: &mut [char]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        loop {
            if self.start == self.valid_end {
                self.validate()?;
            }
            if self.start < self.valid_end {
                return self.take_valid(out);
            }

            if self.eof {
                return if self.start == self.end {
                    Ok(0)
                } else {
                    Err(invalid_utf8("truncated UTF-8 sequence at end of input"))
                };
            }
            self.refill()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that hands out one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match (self.0.split_first(), buf.is_empty()) {
                (Some((&b, rest)), false) => {
                    buf[0] = b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    fn collect(mut src: impl CharRead, chunk: usize) -> io::Result<String> {
        let mut out = String::new();
        let mut buf = vec!['\0'; chunk];
        loop {
            let n = src.read_chars(&mut buf)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend(&buf[..n]);
        }
    }

    #[test]
    fn str_chars_reads_everything() {
        let text = "zipu zigi\nαβγ";
        assert_eq!(collect(StrChars::new(text), 1).unwrap(), text);
        assert_eq!(collect(StrChars::new(text), 100).unwrap(), text);
    }

    #[test]
    fn utf8_split_sequences() {
        let text = "pa-ka α € 𝄞 end";
        assert_eq!(collect(Utf8Chars::new(Trickle(text.as_bytes())), 3).unwrap(), text);
        assert_eq!(collect(Utf8Chars::new(text.as_bytes()), 1).unwrap(), text);
    }

    #[test]
    fn utf8_invalid_data() {
        let err = collect(Utf8Chars::new(&b"pa\xFFka"[..]), 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = collect(Utf8Chars::new(&b"pa\xE2\x82"[..]), 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn utf8_small_reads_walk_validated_prefix() {
        let mut chars = Utf8Chars::new("αβ€z\u{1D11E}".as_bytes());
        let mut one = ['\0'; 1];
        let mut seen = String::new();
        for _ in 0..5 {
            assert_eq!(chars.read_chars(&mut one).unwrap(), 1);
            seen.push(one[0]);
            assert!(chars.start <= chars.valid_end && chars.valid_end <= chars.end);
        }
        assert_eq!(seen, "αβ€z\u{1D11E}");
        // The whole buffer was validated once, by the first read.
        assert_eq!(chars.valid_end, chars.end);
        assert_eq!(chars.read_chars(&mut one).unwrap(), 0);
    }

    #[test]
    fn utf8_error_after_valid_prefix() {
        let mut chars = Utf8Chars::new(&b"ab\xCE\xB1\xFFcd"[..]);
        let mut two = ['\0'; 2];
        assert_eq!(chars.read_chars(&mut two).unwrap(), 2);
        assert_eq!(two, ['a', 'b']);
        assert_eq!(chars.read_chars(&mut two).unwrap(), 1);
        assert_eq!(two[0], 'α');
        let err = chars.read_chars(&mut two).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
