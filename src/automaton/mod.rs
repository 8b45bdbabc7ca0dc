//! Multi-pattern matching automaton
//!
//! A trie over every registered name, completed with failure links and
//! output links so that a text is scanned once, left to right, in time
//! proportional to its length whatever the dictionary size.
//!
//! ```text
//!   PatternEntry*  ──►  AutomatonBuilder  ──build()──►  Automaton (immutable)
//!                                                          │
//!                          normalized text  ──scan()──►  Matches (lazy)
//! ```
//!
//! The automaton works on bytes. Normalized names are ASCII, but patterns
//! and texts may be any UTF-8: a match is always an exact byte-for-byte
//! occurrence of a registered pattern.

mod builder;
mod matcher;

use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

pub use builder::{build_automaton, AutomatonBuilder};
pub use matcher::{Match, Matches, Mention, TextScan};

/// Opaque, cheaply clonable entity identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(Arc<str>);

impl EntityId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A normalized name registered for one entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternEntry {
    pub pattern: String,
    pub entity: EntityId,
}

impl PatternEntry {
    pub fn new(pattern: impl Into<String>, entity: impl Into<EntityId>) -> Self {
        Self {
            pattern: pattern.into(),
            entity: entity.into(),
        }
    }
}

pub(crate) type StateId = u32;
pub(crate) type PatternId = u32;

pub(crate) const ROOT: StateId = 0;

/// Entity set of a terminal state. Most names belong to a single entity.
pub(crate) type EntitySet = SmallVec<[EntityId; 4]>;

#[derive(Debug, Clone)]
pub(crate) struct PatternInfo {
    /// Pattern length in bytes
    pub len: usize,
    pub entities: EntitySet,
}

/// Finalized automaton. Built once by [`AutomatonBuilder`], then only read.
///
/// Holds no traversal state, so one instance can serve any number of
/// concurrent scans behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Automaton {
    /// Full transition row for the root; missing edges loop back to the root
    root: Vec<StateId>,
    /// `transitions[offsets[s]..offsets[s + 1]]` are the goto edges of `s`,
    /// sorted by byte
    offsets: Vec<u32>,
    transitions: Vec<(u8, StateId)>,
    /// Longest proper suffix of the state's prefix that is also a trie prefix
    fail: Vec<StateId>,
    /// Pattern ending exactly at the state
    output: Vec<Option<PatternId>>,
    /// Nearest proper failure ancestor carrying an output
    output_link: Vec<Option<StateId>>,
    patterns: Vec<PatternInfo>,
}

/// Size figures for an automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutomatonStats {
    pub patterns: usize,
    pub states: usize,
    pub transitions: usize,
    pub entity_refs: usize,
}

impl Automaton {
    /// An automaton with no patterns; it never matches.
    pub fn empty() -> Self {
        AutomatonBuilder::new().build()
    }

    /// Number of distinct registered patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn state_count(&self) -> usize {
        self.fail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn stats(&self) -> AutomatonStats {
        AutomatonStats {
            patterns: self.patterns.len(),
            states: self.state_count(),
            transitions: self.transitions.len(),
            entity_refs: self.patterns.iter().map(|p| p.entities.len()).sum(),
        }
    }

    /// Goto edge of `state` on `byte`, without failure fallback
    fn goto(&self, state: StateId, byte: u8) -> Option<StateId> {
        let s = state as usize;
        let row = &self.transitions[self.offsets[s] as usize..self.offsets[s + 1] as usize];
        row.binary_search_by_key(&byte, |(b, _)| *b)
            .ok()
            .map(|i| row[i].1)
    }

    /// Transition function: follows failure links until an edge exists.
    fn next_state(&self, mut state: StateId, byte: u8) -> StateId {
        loop {
            if state == ROOT {
                return self.root[byte as usize];
            }
            if let Some(next) = self.goto(state, byte) {
                return next;
            }
            state = self.fail[state as usize];
        }
    }

    /// First state whose output is reported on entering `state`
    fn first_output(&self, state: StateId) -> Option<StateId> {
        if self.output[state as usize].is_some() {
            Some(state)
        } else {
            self.output_link[state as usize]
        }
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::empty()
    }
}
