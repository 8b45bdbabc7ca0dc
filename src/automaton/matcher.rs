//! Automaton execution
//!
//! [`Matches`] walks the automaton one byte at a time. Entering a state
//! reports the pattern ending there (if any) and then every pattern on its
//! output-link chain, longest first. Matches therefore come out in
//! non-decreasing order of `end`, and matches sharing an `end` are ordered
//! longest to shortest. Nested and overlapping occurrences are all reported.

use std::iter::FusedIterator;

use serde::Serialize;

use super::{Automaton, EntityId, StateId, ROOT};
use crate::normalize::normalize_name;

/// One occurrence of a registered pattern in a scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    /// Byte offset just past the occurrence
    pub end: usize,
    /// Pattern length in bytes
    pub len: usize,
    entities: &'a [EntityId],
}

impl<'a> Match<'a> {
    pub fn start(&self) -> usize {
        self.end - self.len
    }

    /// Every entity registered under the matched pattern
    pub fn entities(&self) -> &'a [EntityId] {
        self.entities
    }

    /// The matched slice of `text`, which must be the scanned text
    pub fn pattern<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.start()..self.end)
    }
}

/// Lazy, single-pass iterator over the matches in one text.
///
/// All traversal state lives here; dropping the iterator early is the way to
/// stop a scan.
#[derive(Debug, Clone)]
pub struct Matches<'a, 't> {
    automaton: &'a Automaton,
    text: &'t [u8],
    pos: usize,
    state: StateId,
    /// Next state on the output chain still to be reported at `pos`
    pending: Option<StateId>,
}

impl<'a, 't> Iterator for Matches<'a, 't> {
    type Item = Match<'a>;

    fn next(&mut self) -> Option<Match<'a>> {
        loop {
            if let Some(state) = self.pending {
                self.pending = self.automaton.output_link[state as usize];
                if let Some(pattern_id) = self.automaton.output[state as usize] {
                    let pattern = &self.automaton.patterns[pattern_id as usize];
                    return Some(Match {
                        end: self.pos,
                        len: pattern.len,
                        entities: &pattern.entities,
                    });
                }
                continue;
            }

            let &byte = self.text.get(self.pos)?;
            self.state = self.automaton.next_state(self.state, byte);
            self.pos += 1;
            self.pending = self.automaton.first_output(self.state);
        }
    }
}

impl FusedIterator for Matches<'_, '_> {}

impl Automaton {
    /// Scan an already normalized text.
    pub fn scan<'a, 't>(&'a self, text: &'t str) -> Matches<'a, 't> {
        Matches {
            automaton: self,
            text: text.as_bytes(),
            pos: 0,
            state: ROOT,
            pending: None,
        }
    }

    /// Normalize raw free text and prepare it for scanning.
    pub fn query(&self, raw: &str) -> TextScan<'_> {
        TextScan {
            automaton: self,
            normalized: normalize_name(raw),
        }
    }

    /// Normalize and scan raw text, collecting owned mentions.
    pub fn find_mentions(&self, raw: &str) -> Vec<Mention> {
        self.query(raw).mentions()
    }
}

/// Raw text normalized against one automaton
#[derive(Debug, Clone)]
pub struct TextScan<'a> {
    automaton: &'a Automaton,
    normalized: Option<String>,
}

impl<'a> TextScan<'a> {
    /// Normalized form of the query, `None` when the text does not normalize
    pub fn normalized(&self) -> Option<&str> {
        self.normalized.as_deref()
    }

    pub fn matches(&self) -> Matches<'a, '_> {
        self.automaton.scan(self.normalized.as_deref().unwrap_or(""))
    }

    pub fn mentions(&self) -> Vec<Mention> {
        let text = self.normalized.as_deref().unwrap_or("");
        self.matches()
            .map(|m| Mention {
                start: m.start(),
                end: m.end,
                pattern: m.pattern(text).unwrap_or_default().to_string(),
                entities: m.entities().to_vec(),
            })
            .collect()
    }
}

/// Owned form of a [`Match`], detached from the automaton
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mention {
    pub start: usize,
    pub end: usize,
    /// Matched normalized name
    pub pattern: String,
    pub entities: Vec<EntityId>,
}
