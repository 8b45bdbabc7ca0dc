//! Property tests for normalization and scanning

use proptest::prelude::*;

use mention_scan::normalize::{normalize, MIN_NAME_CHARS};
use mention_scan::{build_automaton, PatternEntry};

proptest! {
    /// Normalized output is a fixed point.
    #[test]
    fn normalize_is_idempotent(text in "\\PC{0,40}") {
        if let Some(once) = normalize(Some(&text)) {
            prop_assert_eq!(normalize(Some(&once)), Some(once.clone()));
        }
    }

    /// Every normalized name has at least the minimum length and is
    /// uppercase ASCII without spaces.
    #[test]
    fn normalize_output_shape(text in "\\PC{0,40}") {
        if let Some(out) = normalize(Some(&text)) {
            prop_assert!(out.chars().count() >= MIN_NAME_CHARS);
            prop_assert!(out.is_ascii());
            prop_assert!(!out.contains(' '));
            prop_assert_eq!(out.to_uppercase(), out.clone());
        }
    }

    /// Case of the input does not matter, across the Latin blocks names
    /// are accepted from.
    #[test]
    fn normalize_ignores_case(
        text in "[a-zA-Z\u{00C0}-\u{02AF}\u{1E00}-\u{1EFF} ]{0,24}"
    ) {
        let plain = normalize(Some(&text));
        prop_assert_eq!(&plain, &normalize(Some(&text.to_lowercase())));
        prop_assert_eq!(&plain, &normalize(Some(&text.to_uppercase())));
    }

    /// The scanner reports every occurrence of every pattern, ordered by
    /// end offset with the longer pattern first on ties.
    #[test]
    fn scan_is_complete_and_ordered(
        patterns in prop::collection::vec("[AB]{1,4}", 1..6),
        text in "[AB]{0,24}",
    ) {
        let entries: Vec<_> = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| PatternEntry::new(p.clone(), format!("e{}", i)))
            .collect();
        let automaton = build_automaton(entries);

        let found: Vec<(usize, usize)> = automaton
            .scan(&text)
            .map(|m| (m.end, m.len))
            .collect();

        let mut distinct = patterns.clone();
        distinct.sort();
        distinct.dedup();
        let mut expected = Vec::new();
        for end in 1..=text.len() {
            let mut at_end: Vec<usize> = distinct
                .iter()
                .filter(|p| p.len() <= end && text[..end].ends_with(p.as_str()))
                .map(|p| p.len())
                .collect();
            at_end.sort_unstable_by(|a, b| b.cmp(a));
            expected.extend(at_end.into_iter().map(|len| (end, len)));
        }

        prop_assert_eq!(found, expected);
    }
}
