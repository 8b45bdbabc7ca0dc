//! Dictionary building: entity records in, pattern entries out
//!
//! Records can be fed one at a time, so a dataset can be streamed through
//! without ever holding more than the accumulated pattern set.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use super::record::EntityRecord;
use super::schema::RecordSchema;
use crate::automaton::PatternEntry;
use crate::error::RecordError;
use crate::normalize::{is_latin_script, normalize_name};

/// Malformed lines beyond this count are only tallied, not logged one by one
const MAX_LOGGED_MALFORMED: usize = 20;

/// Counters for one dictionary build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DictionaryStats {
    pub records_seen: usize,
    pub records_malformed: usize,
    pub records_not_legal_entity: usize,
    /// Legal entities that contributed at least one pattern
    pub records_indexed: usize,
    pub names_non_latin: usize,
    pub names_unnormalizable: usize,
    pub patterns: usize,
}

/// Turns entity records into (normalized name, entity id) pairs.
pub struct DictionaryBuilder<'s> {
    schema: &'s dyn RecordSchema,
    is_latin: fn(&str) -> bool,
    entries: Vec<PatternEntry>,
    stats: DictionaryStats,
}

impl<'s> DictionaryBuilder<'s> {
    pub fn new(schema: &'s dyn RecordSchema) -> Self {
        Self {
            schema,
            is_latin: is_latin_script,
            entries: Vec::new(),
            stats: DictionaryStats::default(),
        }
    }

    /// Replace the Latin-script predicate
    pub fn with_script_predicate(mut self, is_latin: fn(&str) -> bool) -> Self {
        self.is_latin = is_latin;
        self
    }

    /// Add one record. Returns the number of patterns it contributed.
    pub fn add_record(&mut self, record: &EntityRecord) -> usize {
        self.stats.records_seen += 1;

        if !self.schema.is_legal_entity(&record.schema) {
            self.stats.records_not_legal_entity += 1;
            return 0;
        }

        let mut names: BTreeSet<String> = BTreeSet::new();
        for property in self.schema.matchable_name_properties(&record.schema) {
            for value in record.get(property) {
                if !(self.is_latin)(value) {
                    self.stats.names_non_latin += 1;
                    continue;
                }
                match normalize_name(value) {
                    Some(name) => {
                        names.insert(name);
                    }
                    None => self.stats.names_unnormalizable += 1,
                }
            }
        }

        let added = names.len();
        if added > 0 {
            self.stats.records_indexed += 1;
            self.stats.patterns += added;
        }
        self.entries.extend(
            names
                .into_iter()
                .map(|name| PatternEntry::new(name, record.id.clone())),
        );
        added
    }

    /// Parse and add one raw dataset line.
    ///
    /// Blank lines are ignored. Malformed records are counted, logged and
    /// skipped; they never abort the build.
    pub fn add_line(&mut self, line: &str) -> Result<usize, RecordError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(0);
        }

        match EntityRecord::from_json_line(line) {
            Ok(record) => Ok(self.add_record(&record)),
            Err(e) => {
                self.stats.records_seen += 1;
                self.stats.records_malformed += 1;
                if self.stats.records_malformed <= MAX_LOGGED_MALFORMED {
                    warn!(error = %e, "Skipping malformed entity record");
                }
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> &DictionaryStats {
        &self.stats
    }

    /// Finish the pass, handing over every entry in registration order.
    pub fn finish(self) -> (Vec<PatternEntry>, DictionaryStats) {
        debug!(
            records = self.stats.records_seen,
            indexed = self.stats.records_indexed,
            patterns = self.stats.patterns,
            "Dictionary built"
        );
        (self.entries, self.stats)
    }
}

/// Build pattern entries from a sequence of records.
pub fn build_dictionary<'r, I>(records: I, schema: &dyn RecordSchema) -> Vec<PatternEntry>
where
    I: IntoIterator<Item = &'r EntityRecord>,
{
    let mut builder = DictionaryBuilder::new(schema);
    for record in records {
        builder.add_record(record);
    }
    builder.finish().0
}
