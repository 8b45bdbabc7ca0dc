//! Automaton construction
//!
//! Three phases: insert every pattern into a byte trie (merging repeated
//! names into one terminal), compute failure and output links breadth-first
//! from the root, then pack the trie into the flat layout used for scanning.

use std::collections::VecDeque;

use smallvec::SmallVec;
use tracing::debug;

use super::{Automaton, EntityId, PatternEntry, PatternId, PatternInfo, StateId, ROOT};

#[derive(Debug, Default)]
struct TrieNode {
    /// Goto edges, sorted by byte
    children: Vec<(u8, StateId)>,
    pattern: Option<PatternId>,
}

impl TrieNode {
    fn child(&self, byte: u8) -> Option<StateId> {
        self.children
            .binary_search_by_key(&byte, |(b, _)| *b)
            .ok()
            .map(|i| self.children[i].1)
    }
}

/// Collects patterns and turns them into an [`Automaton`].
///
/// Registration order fixes state and pattern numbering, so the same
/// ordered input always yields the same automaton.
#[derive(Debug)]
pub struct AutomatonBuilder {
    nodes: Vec<TrieNode>,
    patterns: Vec<PatternInfo>,
    skipped_empty: usize,
}

impl Default for AutomatonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            patterns: Vec::new(),
            skipped_empty: 0,
        }
    }

    /// Register `pattern` for `entity`.
    ///
    /// A pattern registered again (for the same or another entity) reuses
    /// its terminal state; the entity is added to that state's set once.
    /// Empty patterns are ignored since they would match everywhere.
    pub fn add(&mut self, pattern: &str, entity: EntityId) {
        if pattern.is_empty() {
            self.skipped_empty += 1;
            return;
        }

        let mut state = ROOT;
        for &byte in pattern.as_bytes() {
            state = match self.nodes[state as usize].child(byte) {
                Some(next) => next,
                None => self.push_child(state, byte),
            };
        }

        let pattern_id = match self.nodes[state as usize].pattern {
            Some(id) => id,
            None => {
                let id = self.patterns.len() as PatternId;
                self.patterns.push(PatternInfo {
                    len: pattern.len(),
                    entities: SmallVec::new(),
                });
                self.nodes[state as usize].pattern = Some(id);
                id
            }
        };

        let entities = &mut self.patterns[pattern_id as usize].entities;
        if !entities.contains(&entity) {
            entities.push(entity);
        }
    }

    pub fn add_entry(&mut self, entry: PatternEntry) {
        self.add(&entry.pattern, entry.entity);
    }

    /// Number of distinct patterns registered so far
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    fn push_child(&mut self, parent: StateId, byte: u8) -> StateId {
        let id = self.nodes.len() as StateId;
        self.nodes.push(TrieNode::default());
        let children = &mut self.nodes[parent as usize].children;
        let pos = children.partition_point(|(b, _)| *b < byte);
        children.insert(pos, (byte, id));
        id
    }

    /// Compute failure/output links and freeze the automaton.
    pub fn build(self) -> Automaton {
        let nodes = self.nodes;
        let n = nodes.len();

        let mut root = vec![ROOT; 256];
        for &(byte, child) in &nodes[ROOT as usize].children {
            root[byte as usize] = child;
        }

        let mut fail = vec![ROOT; n];
        let mut output_link: Vec<Option<StateId>> = vec![None; n];
        let mut queue: VecDeque<StateId> = nodes[ROOT as usize]
            .children
            .iter()
            .map(|&(_, child)| child)
            .collect();

        while let Some(state) = queue.pop_front() {
            for &(byte, child) in &nodes[state as usize].children {
                let mut f = fail[state as usize];
                let target = loop {
                    if f == ROOT {
                        break root[byte as usize];
                    }
                    if let Some(next) = nodes[f as usize].child(byte) {
                        break next;
                    }
                    f = fail[f as usize];
                };

                fail[child as usize] = target;
                output_link[child as usize] = if nodes[target as usize].pattern.is_some() {
                    Some(target)
                } else {
                    output_link[target as usize]
                };
                queue.push_back(child);
            }
        }

        let mut offsets = Vec::with_capacity(n + 1);
        let mut transitions = Vec::with_capacity(n.saturating_sub(1));
        let mut output = Vec::with_capacity(n);
        for node in &nodes {
            offsets.push(transitions.len() as u32);
            transitions.extend_from_slice(&node.children);
            output.push(node.pattern);
        }
        offsets.push(transitions.len() as u32);

        debug!(
            patterns = self.patterns.len(),
            states = n,
            skipped_empty = self.skipped_empty,
            "Automaton built"
        );

        Automaton {
            root,
            offsets,
            transitions,
            fail,
            output,
            output_link,
            patterns: self.patterns,
        }
    }
}

impl Extend<PatternEntry> for AutomatonBuilder {
    fn extend<I: IntoIterator<Item = PatternEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.add_entry(entry);
        }
    }
}

/// Build an automaton from a sequence of pattern entries.
///
/// An empty sequence yields an automaton that matches nothing.
pub fn build_automaton<I>(entries: I) -> Automaton
where
    I: IntoIterator<Item = PatternEntry>,
{
    let mut builder = AutomatonBuilder::new();
    builder.extend(entries);
    builder.build()
}
