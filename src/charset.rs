// Character range sets and backslash escapes.
//
// A set is written as a run of items, each either a single character or
// a range `first-last`, e.g. `a-z0-9@` or `\u0000-\u001F`. Items may use
// the escapes understood by `unescape()`; a literal `-` inside a list is
// written `\-`. Parsed sets are sorted and merged so lookups never see
// overlapping ranges.

use std::fmt;
use std::str::FromStr;

/// Range count at which lookups switch from a linear scan to binary search.
pub const BINARY_SEARCH_MINIMUM: usize = 32;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Malformed range list or escape sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharSetError {
    #[error("expected escape character at offset {offset}")]
    DanglingEscape { offset: usize },
    #[error("unknown escape '\\{found}' at offset {offset}")]
    UnknownEscape { offset: usize, found: char },
    #[error("expected 4 hex digits after \\u at offset {offset}")]
    BadUnicodeEscape { offset: usize },
    #[error("\\u{value:04X} at offset {offset} is not a valid character")]
    InvalidCodePoint { offset: usize, value: u32 },
    #[error("range starting at offset {offset} has no end character")]
    DanglingRange { offset: usize },
    #[error("range {first:?}-{last:?} is reversed")]
    ReversedRange { first: char, last: char },
}

// ---------------------------------------------------------------------------
// Escapes
// ---------------------------------------------------------------------------

/// Decode one (possibly escaped) character starting at `index`.
///
/// Returns the character and the index just past it.
fn unescape_at(text: &[char], index: usize) -> Result<(char, usize), CharSetError> {
    let first = text[index];
    if first != '\\' {
        return Ok((first, index + 1));
    }
    let at = index + 1;
    let Some(&next) = text.get(at) else {
        return Err(CharSetError::DanglingEscape { offset: at });
    };
    let simple = match next {
        '-' => Some('-'),
        't' => Some('\t'),
        'b' => Some('\u{8}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        'f' => Some('\u{c}'),
        '\'' => Some('\''),
        '"' => Some('"'),
        '\\' => Some('\\'),
        _ => None,
    };
    if let Some(c) = simple {
        return Ok((c, at + 1));
    }

    if next == 'u' {
        let digits = text
            .get(at + 1..at + 5)
            .ok_or(CharSetError::BadUnicodeEscape { offset: at })?;
        let mut value = 0u32;
        for d in digits {
            let nibble = d
                .to_digit(16)
                .ok_or(CharSetError::BadUnicodeEscape { offset: at })?;
            value = (value << 4) | nibble;
        }
        let c = char::from_u32(value).ok_or(CharSetError::InvalidCodePoint { offset: at, value })?;
        return Ok((c, at + 5));
    }

    if next.is_digit(8) {
        let mut end = at;
        let mut value = 0u32;
        while end < text.len() && end - at < 3 {
            let Some(d) = text[end].to_digit(8) else {
                break;
            };
            value = value * 8 + d;
            end += 1;
        }
        if value > 0xFF {
            // Only byte-sized octal escapes; the last digit stays literal.
            value >>= 3;
            end -= 1;
        }
        // value <= 0xFF here
        let c = char::from_u32(value).ok_or(CharSetError::InvalidCodePoint { offset: at, value })?;
        return Ok((c, end));
    }

    Err(CharSetError::UnknownEscape {
        offset: at,
        found: next,
    })
}

/// Resolve backslash escapes (`\t \b \n \r \f \' \" \\ \-`, `\uXXXX` and
/// up to three octal digits) in `text`.
pub fn unescape(text: &str) -> Result<String, CharSetError> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let (c, next) = unescape_at(&chars, i)?;
        out.push(c);
        i = next;
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// CharRange
// ---------------------------------------------------------------------------

/// Inclusive range of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharRange {
    pub first: char,
    pub last: char,
}

impl CharRange {
    pub const fn new(first: char, last: char) -> Self {
        Self { first, last }
    }

    pub const fn single(c: char) -> Self {
        Self { first: c, last: c }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.first <= c && c <= self.last
    }
}

// ---------------------------------------------------------------------------
// CharSet
// ---------------------------------------------------------------------------

/// Sorted, non-overlapping, non-adjacent set of character ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CharSet {
    ranges: Vec<CharRange>,
}

impl CharSet {
    /// Build a set from arbitrary (unsorted, overlapping) ranges.
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = CharRange>,
    {
        let mut sorted: Vec<CharRange> = ranges.into_iter().collect();
        sorted.sort_by_key(|r| (r.first, r.last));

        let mut merged: Vec<CharRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(prev) if range.first as u32 <= prev.last as u32 + 1 => {
                    if range.last > prev.last {
                        prev.last = range.last;
                    }
                }
                _ => merged.push(range),
            }
        }
        Self { ranges: merged }
    }

    /// Parse a range list such as `a-z0-9@`.
    pub fn parse(text: &str) -> Result<Self, CharSetError> {
        let chars: Vec<char> = text.chars().collect();
        let mut ranges = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let start = i;
            let (first, next) = unescape_at(&chars, i)?;
            if chars.get(next) != Some(&'-') {
                ranges.push(CharRange::single(first));
                i = next;
                continue;
            }
            if next + 1 >= chars.len() {
                return Err(CharSetError::DanglingRange { offset: start });
            }
            let (last, after) = unescape_at(&chars, next + 1)?;
            if last < first {
                return Err(CharSetError::ReversedRange { first, last });
            }
            ranges.push(CharRange::new(first, last));
            i = after;
        }
        Ok(Self::from_ranges(ranges))
    }

    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Membership test. Large sets use binary search.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        if self.ranges.len() >= BINARY_SEARCH_MINIMUM {
            let idx = self.ranges.partition_point(|r| r.first <= c);
            idx > 0 && self.ranges[idx - 1].last >= c
        } else {
            self.ranges.iter().any(|r| r.contains(c))
        }
    }
}

impl FromStr for CharSet {
    type Err = CharSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    if c == '-' || c == '\\' {
        f.write_str("\\")?;
    }
    write!(f, "{c}")
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for range in &self.ranges {
            write_literal(f, range.first)?;
            if range.first != range.last {
                f.write_str("-")?;
                write_literal(f, range.last)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(set: &CharSet, expected: impl Fn(char) -> bool) {
        for i in 0..0x3000u32 {
            let Some(c) = char::from_u32(i) else { continue };
            assert_eq!(set.contains(c), expected(c), "character {c:?} ({i})");
        }
    }

    #[test]
    fn parse_ranges_and_singles() {
        let set = CharSet::parse("a-z0-9@").unwrap();
        compare(&set, |c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '@');
    }

    #[test]
    fn parse_list_of_digits() {
        let set = CharSet::parse("0123456789").unwrap();
        compare(&set, |c| c.is_ascii_digit());
        assert_eq!(set.ranges(), &[CharRange::new('0', '9')]);
    }

    #[test]
    fn minimize_merges_adjacent_and_overlapping() {
        assert_eq!(CharSet::parse("9876543210a").unwrap().to_string(), "0-9a");
        assert_eq!(CharSet::parse("a-y0-53-789b-z").unwrap().to_string(), "0-9a-z");
        assert_eq!(CharSet::parse("012346789").unwrap().to_string(), "0-46-9");
    }

    #[test]
    fn escaped_dash_and_backslash() {
        let set = CharSet::parse("\\-_\\\\").unwrap();
        assert!(set.contains('-'));
        assert!(set.contains('_'));
        assert!(set.contains('\\'));
        assert!(!set.contains('a'));
        assert_eq!(CharSet::parse(&set.to_string()).unwrap(), set);
    }

    #[test]
    fn unicode_range() {
        let set = CharSet::parse("\\u0000-\\u001F").unwrap();
        compare(&set, |c| (c as u32) < 0x20);
    }

    #[test]
    fn binary_search_matches_linear_scan() {
        // 48 isolated characters force the binary search path.
        let ranges: Vec<CharRange> = (0..48u32)
            .map(|i| CharRange::single(char::from_u32(0x41 + i * 3).unwrap()))
            .chain([CharRange::new('\u{1000}', '\u{10FF}')])
            .collect();
        let set = CharSet::from_ranges(ranges.clone());
        assert!(set.ranges().len() >= BINARY_SEARCH_MINIMUM);
        compare(&set, |c| ranges.iter().any(|r| r.contains(c)));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            CharSet::parse("a-"),
            Err(CharSetError::DanglingRange { offset: 0 })
        );
        assert_eq!(
            CharSet::parse("z-a"),
            Err(CharSetError::ReversedRange {
                first: 'z',
                last: 'a'
            })
        );
        assert!(matches!(
            CharSet::parse("\\q"),
            Err(CharSetError::UnknownEscape { found: 'q', .. })
        ));
        assert!(matches!(
            CharSet::parse("\\u12"),
            Err(CharSetError::BadUnicodeEscape { .. })
        ));
    }

    #[test]
    fn unescape_strings() {
        assert_eq!(unescape("Hello\\r\\n").unwrap(), "Hello\r\n");
        assert_eq!(unescape("Unicode \\u03b1-\\t").unwrap(), "Unicode \u{3b1}-\t");
        assert_eq!(unescape("\\u03B3-at-start").unwrap(), "\u{3b3}-at-start");
        assert_eq!(
            unescape("Testing octal: \\0 \\12\\377 ").unwrap(),
            "Testing octal: \0 \n\u{ff} "
        );
        assert_eq!(unescape("Too large octal: \\650 ").unwrap(), "Too large octal: 50 ");
        assert!(unescape("trailing\\").is_err());
        assert!(unescape("\\uD800").is_err());
    }
}
