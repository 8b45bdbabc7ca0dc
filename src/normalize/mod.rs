//! Text normalization for name matching
//!
//! Dictionary names and scanned text go through the same pipeline so that
//! both end up in one comparable alphabet:
//! - Case folding (lower case), so letters whose upper and lower forms
//!   romanize differently still agree
//! - Unicode NFKD decomposition
//! - Transliteration to ASCII (diacritics stripped, other scripts romanized)
//! - Category filter ([`category::NAME_FORM`])
//! - Whitespace collapse and a minimum length of three characters
//! - Upper-casing
//!
//! The result is deterministic and idempotent: feeding a normalized name
//! back in returns it unchanged.

pub mod category;
pub mod script;

use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

pub use category::{category_replace, CategoryAction, NAME_FORM};
pub use script::is_latin_script;

/// Names shorter than this are too ambiguous to be match keys (initials etc.)
pub const MIN_NAME_CHARS: usize = 3;

/// Normalize a possibly absent string for matching.
///
/// Returns `None` for absent input and for anything that is shorter than
/// [`MIN_NAME_CHARS`] once filtered.
///
/// # Examples
///
/// ```
/// use mention_scan::normalize::normalize;
///
/// assert_eq!(normalize(Some("Vladimir Putin")), Some("VLADIMIRPUTIN".to_string()));
/// assert_eq!(normalize(Some("Société Générale")), Some("SOCIETEGENERALE".to_string()));
/// assert_eq!(normalize(Some("J.R.")), None);
/// assert_eq!(normalize(None), None);
/// ```
pub fn normalize(text: Option<&str>) -> Option<String> {
    let ascii = ascii_text(text?);
    let filtered = category_replace(&ascii, NAME_FORM);
    let collapsed = collapse_spaces(&filtered);

    if collapsed.chars().count() < MIN_NAME_CHARS {
        return None;
    }

    Some(collapsed.to_uppercase())
}

/// Shorthand for [`normalize`] on a present string.
pub fn normalize_name(text: &str) -> Option<String> {
    normalize(Some(text))
}

/// Case-fold and transliterate `text` to plain ASCII.
///
/// Pictographs (`OtherSymbol`) and the combining marks split off by NFKD are
/// removed before romanization so an emoji never turns into words. Every
/// other character is transliterated first and left to the category filter,
/// so currency and math signs keep their ASCII rendering (`€` becomes `EUR`).
pub fn ascii_text(text: &str) -> String {
    let folded = text.to_lowercase();
    let decomposed: String = folded.nfkd().filter(|c| !is_dropped_early(*c)).collect();
    deunicode::deunicode_with_tofu(&decomposed, "")
}

fn is_dropped_early(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::OtherSymbol
            | GeneralCategory::NonspacingMark
            | GeneralCategory::EnclosingMark
    )
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_input() {
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn test_basic_names() {
        assert_eq!(normalize_name("Vladimir Putin").as_deref(), Some("VLADIMIRPUTIN"));
        assert_eq!(normalize_name("Russia").as_deref(), Some("RUSSIA"));
        assert_eq!(
            normalize_name("Goldman Sachs & Co.").as_deref(),
            Some("GOLDMANSACHSCO")
        );
    }

    #[test]
    fn test_diacritics_stripped() {
        assert_eq!(
            normalize_name("Société Générale").as_deref(),
            Some("SOCIETEGENERALE")
        );
        assert_eq!(normalize_name("Ünal Çelik").as_deref(), Some("UNALCELIK"));
        assert_eq!(normalize_name("Łukasz Żółw").as_deref(), Some("LUKASZZOLW"));
    }

    #[test]
    fn test_compatibility_forms() {
        // Full-width Latin folds through NFKD
        assert_eq!(normalize_name("Ａｐｐｌｅ").as_deref(), Some("APPLE"));
        // Ligatures decompose
        assert_eq!(normalize_name("ﬁnance").as_deref(), Some("FINANCE"));
    }

    #[test]
    fn test_other_scripts_romanized() {
        assert_eq!(normalize_name("Владимир Путин").as_deref(), Some("VLADIMIRPUTIN"));
    }

    #[test]
    fn test_too_short() {
        assert_eq!(normalize_name(""), None);
        assert_eq!(normalize_name("AB"), None);
        assert_eq!(normalize_name("J.R."), None);
        assert_eq!(normalize_name("  a - b  "), None);
        assert_eq!(normalize_name("abc").as_deref(), Some("ABC"));
    }

    #[test]
    fn test_currency_signs_transliterated() {
        assert_eq!(normalize_name("€ 100").as_deref(), Some("EUR100"));
        assert_eq!(normalize_name("€uro Bank").as_deref(), Some("EURUROBANK"));
        assert_eq!(normalize_name("£ Sterling").as_deref(), Some("PSSTERLING"));
    }

    #[test]
    fn test_pictographs_dropped() {
        assert_eq!(normalize_name("\u{1F984}"), None);
        assert_eq!(normalize_name("© Acme").as_deref(), Some("ACME"));
        assert_eq!(normalize_name("Acme \u{2764}").as_deref(), Some("ACME"));
    }

    #[test]
    fn test_case_folded_before_transliteration() {
        // Ʒ and ʒ romanize differently unless folded first
        assert_eq!(normalize_name("Ʒab"), normalize_name("ʒab"));
        assert_eq!(normalize_name("ƷAB"), normalize_name("ʒab"));
        assert_eq!(normalize_name("ẞtraße"), normalize_name("sstrasse"));
    }

    #[test]
    fn test_idempotent_on_examples() {
        for s in ["Vladimir Putin", "Société Générale", "O'Brien-Smith", "Ａｐｐｌｅ"] {
            let once = normalize_name(s).unwrap();
            assert_eq!(normalize_name(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn test_query_text() {
        let text = "My name is Vladimir Putin, I am the President of Russia";
        assert_eq!(
            normalize_name(text).as_deref(),
            Some("MYNAMEISVLADIMIRPUTINIAMTHEPRESIDENTOFRUSSIA")
        );
    }
}
