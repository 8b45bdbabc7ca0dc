//! Automaton snapshots
//!
//! A snapshot is one immutable build of the automaton together with where it
//! came from, when it was built and a content fingerprint. Snapshots are
//! shared through `Arc` and never modified; a refresh builds a new one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::automaton::{build_automaton, Automaton, AutomatonStats, Mention, PatternEntry};
use crate::dictionary::DictionaryStats;

/// An immutable, fingerprinted automaton build
#[derive(Debug)]
pub struct AutomatonSnapshot {
    automaton: Automaton,
    fingerprint: String,
    built_at: DateTime<Utc>,
    source: String,
    dictionary: DictionaryStats,
}

impl AutomatonSnapshot {
    /// Build the automaton for `entries` and wrap it.
    pub fn build(
        entries: Vec<PatternEntry>,
        dictionary: DictionaryStats,
        source: impl Into<String>,
    ) -> Self {
        let fingerprint = fingerprint(&entries);
        let automaton = build_automaton(entries);

        Self {
            automaton,
            fingerprint,
            built_at: Utc::now(),
            source: source.into(),
            dictionary,
        }
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// SHA-256 over the ordered pattern entries, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Normalize and scan raw text against this snapshot
    pub fn find_mentions(&self, raw: &str) -> Vec<Mention> {
        self.automaton.find_mentions(raw)
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            fingerprint: self.fingerprint.clone(),
            built_at: self.built_at,
            source: self.source.clone(),
            dictionary: self.dictionary,
            automaton: self.automaton.stats(),
        }
    }
}

/// Fingerprint of an ordered pattern set
pub fn fingerprint(entries: &[PatternEntry]) -> String {
    let mut hasher = Sha256::new();
    for entry in entries {
        hasher.update(entry.pattern.as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.entity.as_str().as_bytes());
        hasher.update([b'\n']);
    }
    hex::encode(hasher.finalize())
}

/// Snapshot statistics
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStats {
    pub fingerprint: String,
    pub built_at: DateTime<Utc>,
    pub source: String,
    pub dictionary: DictionaryStats,
    pub automaton: AutomatonStats,
}

impl fmt::Display for SnapshotStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Automaton Snapshot Statistics:")?;
        writeln!(f, "  Source: {}", self.source)?;
        writeln!(f, "  Built at: {}", self.built_at.to_rfc3339())?;
        writeln!(
            f,
            "  Fingerprint: {}",
            self.fingerprint.get(..16).unwrap_or(&self.fingerprint)
        )?;
        writeln!(f, "  Records seen: {}", self.dictionary.records_seen)?;
        writeln!(f, "  Records malformed: {}", self.dictionary.records_malformed)?;
        writeln!(
            f,
            "  Records not legal entities: {}",
            self.dictionary.records_not_legal_entity
        )?;
        writeln!(f, "  Records indexed: {}", self.dictionary.records_indexed)?;
        writeln!(f, "  Names non-Latin: {}", self.dictionary.names_non_latin)?;
        writeln!(
            f,
            "  Names unnormalizable: {}",
            self.dictionary.names_unnormalizable
        )?;
        writeln!(f, "  Patterns: {}", self.automaton.patterns)?;
        writeln!(f, "  States: {}", self.automaton.states)?;
        writeln!(f, "  Entity references: {}", self.automaton.entity_refs)?;
        Ok(())
    }
}
