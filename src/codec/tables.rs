// Symbol tables for the BS-6 and BS-8 alphabets.
//
// Every byte pair is spelled as consonant/vowel symbols:
//   - BS-6: 4-bit consonants and 2-bit vowels, one character each
//   - BS-8: one consonant (high nibble) and one vowel (low nibble) per
//     byte, each one or two characters long
//
// The reverse lookups are plain `match` tables so the decoders stay
// branch-predictable on the hot path.

// ---------------------------------------------------------------------------
// BS-6
// ---------------------------------------------------------------------------

/// BS-6 consonants, indexed by a 4-bit value.
pub const BS6_CONSONANTS: [char; 16] = [
    'p', 'b', 't', 'd', 'k', 'g', 'x', 'j', 'f', 'v', 'l', 'r', 'm', 'n', 's', 'z',
];

/// BS-6 vowels, indexed by a 2-bit value.
pub const BS6_VOWELS: [char; 4] = ['a', 'u', 'i', 'e'];

/// Bits carried by a BS-6 consonant.
pub const BS6_CONSONANT_BITS: u32 = 4;

/// Bits carried by a BS-6 vowel.
pub const BS6_VOWEL_BITS: u32 = 2;

/// Map a BS-6 consonant back to its 4-bit value.
#[inline]
pub const fn bs6_consonant(c: char) -> Option<u8> {
    Some(match c {
        'p' => 0x0,
        'b' => 0x1,
        't' => 0x2,
        'd' => 0x3,
        'k' => 0x4,
        'g' => 0x5,
        'x' => 0x6,
        'j' => 0x7,
        'f' => 0x8,
        'v' => 0x9,
        'l' => 0xA,
        'r' => 0xB,
        'm' => 0xC,
        'n' => 0xD,
        's' => 0xE,
        'z' => 0xF,
        _ => return None,
    })
}

/// Map a BS-6 vowel back to its 2-bit value.
#[inline]
pub const fn bs6_vowel(c: char) -> Option<u8> {
    Some(match c {
        'a' => 0x0,
        'u' => 0x1,
        'i' => 0x2,
        'e' => 0x3,
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// BS-8
// ---------------------------------------------------------------------------

/// BS-8 consonants, indexed by the high nibble of a byte.
pub const BS8_CONSONANTS: [&str; 16] = [
    "p", "b", "t", "d", "k", "g", "ch", "j", "f", "v", "l", "r", "m", "y", "s", "z",
];

/// BS-8 vowels, indexed by the low nibble of a byte.
pub const BS8_VOWELS: [&str; 16] = [
    "a", "e", "i", "o", "u", "an", "en", "in", "un", "on", "ai", "ei", "oi", "ui", "aw", "ow",
];

/// Nibble spelled by the two-character consonant `ch`.
pub const BS8_CH: u8 = 0x6;

/// Map a single-character BS-8 consonant to its nibble.
///
/// `c` is not accepted here; it only starts the `ch` digraph.
#[inline]
pub const fn bs8_consonant(c: char) -> Option<u8> {
    Some(match c {
        'p' => 0x0,
        'b' => 0x1,
        't' => 0x2,
        'd' => 0x3,
        'k' => 0x4,
        'g' => 0x5,
        'j' => 0x7,
        'f' => 0x8,
        'v' => 0x9,
        'l' => 0xA,
        'r' => 0xB,
        'm' => 0xC,
        'y' => 0xD,
        's' => 0xE,
        'z' => 0xF,
        _ => return None,
    })
}

/// Nibble of a bare BS-8 vowel. Every BS-8 vowel starts with one of these.
#[inline]
pub const fn bs8_vowel_prefix(c: char) -> Option<u8> {
    Some(match c {
        'a' => 0x0,
        'e' => 0x1,
        'i' => 0x2,
        'o' => 0x3,
        'u' => 0x4,
        _ => return None,
    })
}

/// Nibble of a two-character BS-8 vowel.
#[inline]
pub const fn bs8_vowel_pair(prefix: char, suffix: char) -> Option<u8> {
    Some(match (prefix, suffix) {
        ('a', 'n') => 0x5,
        ('e', 'n') => 0x6,
        ('i', 'n') => 0x7,
        ('u', 'n') => 0x8,
        ('o', 'n') => 0x9,
        ('a', 'i') => 0xA,
        ('e', 'i') => 0xB,
        ('o', 'i') => 0xC,
        ('u', 'i') => 0xD,
        ('a', 'w') => 0xE,
        ('o', 'w') => 0xF,
        _ => return None,
    })
}

/// Characters that may only appear as the second half of a BS-8 vowel.
#[inline]
pub const fn is_bs8_vowel_suffix(c: char) -> bool {
    matches!(c, 'n' | 'i' | 'w')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bs6_tables_invert() {
        for (value, &c) in BS6_CONSONANTS.iter().enumerate() {
            assert_eq!(bs6_consonant(c), Some(value as u8));
            assert_eq!(bs6_vowel(c), None, "{c} is both consonant and vowel");
        }
        for (value, &c) in BS6_VOWELS.iter().enumerate() {
            assert_eq!(bs6_vowel(c), Some(value as u8));
        }
    }

    #[test]
    fn bs8_tables_invert() {
        for (value, symbol) in BS8_CONSONANTS.iter().enumerate() {
            let mut chars = symbol.chars();
            let first = chars.next().unwrap();
            match chars.next() {
                None => assert_eq!(bs8_consonant(first), Some(value as u8)),
                Some('h') => {
                    assert_eq!(first, 'c');
                    assert_eq!(value as u8, BS8_CH);
                }
                Some(other) => panic!("unexpected consonant tail {other}"),
            }
        }
        for (value, symbol) in BS8_VOWELS.iter().enumerate() {
            let chars: Vec<char> = symbol.chars().collect();
            let decoded = match chars.as_slice() {
                [bare] => bs8_vowel_prefix(*bare),
                [prefix, suffix] => bs8_vowel_pair(*prefix, *suffix),
                _ => None,
            };
            assert_eq!(decoded, Some(value as u8), "vowel {symbol}");
        }
    }

    #[test]
    fn bs8_suffixes_never_start_a_consonant() {
        for c in ['n', 'i', 'w'] {
            assert!(is_bs8_vowel_suffix(c));
            assert_eq!(bs8_consonant(c), None);
        }
        assert_eq!(bs8_consonant('c'), None);
        assert_eq!(bs8_vowel_pair('i', 'w'), None);
    }
}
