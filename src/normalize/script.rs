//! Latin-script detection
//!
//! Only names written in Latin script are registered: romanizing other
//! scripts is lossy and produces unreliable match keys.

/// Unicode blocks holding Latin letters
const LATIN_RANGES: &[(char, char)] = &[
    ('\u{0000}', '\u{007F}'), // Basic Latin
    ('\u{0080}', '\u{00FF}'), // Latin-1 Supplement
    ('\u{0100}', '\u{017F}'), // Latin Extended-A
    ('\u{0180}', '\u{024F}'), // Latin Extended-B
    ('\u{0250}', '\u{02AF}'), // IPA Extensions
    ('\u{1D00}', '\u{1DBF}'), // Phonetic Extensions (+ Supplement)
    ('\u{1E00}', '\u{1EFF}'), // Latin Extended Additional
    ('\u{2C60}', '\u{2C7F}'), // Latin Extended-C
    ('\u{A720}', '\u{A7FF}'), // Latin Extended-D
    ('\u{AB30}', '\u{AB6F}'), // Latin Extended-E
    ('\u{FB00}', '\u{FB06}'), // Latin ligatures
    ('\u{FF21}', '\u{FF3A}'), // Fullwidth Latin capitals
    ('\u{FF41}', '\u{FF5A}'), // Fullwidth Latin small letters
];

fn is_latin_char(c: char) -> bool {
    LATIN_RANGES
        .iter()
        .any(|(lo, hi)| (*lo..=*hi).contains(&c))
}

/// Check whether every letter in `s` belongs to the Latin script.
///
/// Digits, punctuation, spaces and combining marks do not count either way.
pub fn is_latin_script(s: &str) -> bool {
    s.chars()
        .filter(|c| c.is_alphabetic())
        .all(is_latin_char)
}
