//! Mention Scan - Entity Name Mention Detection
//!
//! Finds every occurrence of a known entity name inside free text. Names of
//! legal entities (people, companies, organizations) are taken from a
//! FollowTheMoney JSON-lines dataset, normalized to an aggressive ASCII form
//! and compiled into a single Aho-Corasick automaton. Query text goes
//! through the same normalization and is scanned in one linear pass.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Consumers: CLI, embedding services                             │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Snapshot Registry                              │
//! │            current Arc<AutomatonSnapshot>                        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Refresh Pipeline                                │
//! │   DatasetSource -> DictionaryBuilder -> build_automaton          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use mention_scan::{MatcherConfig, RefreshPipeline, SnapshotRegistry};
//!
//! let config = MatcherConfig::from_file("config/mention_scan.yaml")?;
//! let pipeline = RefreshPipeline::from_config(&config)?;
//! let registry = Arc::new(SnapshotRegistry::new());
//! pipeline.refresh(&registry).await?;
//!
//! for mention in registry.find_mentions("Vladimir Putin visited Russia").await? {
//!     println!("{} {:?}", mention.pattern, mention.entities);
//! }
//! ```

pub mod automaton;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod index;
pub mod normalize;
pub mod refresh;
pub mod source;

// Re-export main types
pub use automaton::{
    build_automaton, Automaton, AutomatonBuilder, EntityId, Match, Mention, PatternEntry,
    TextScan,
};
pub use config::{MatcherConfig, RefreshConfig, SourceConfig, StartupMode};
pub use dictionary::{build_dictionary, DictionaryBuilder, EntityRecord, SchemaModel};
pub use error::{Error, MatchError, Result};
pub use index::{AutomatonSnapshot, SnapshotRegistry};
pub use normalize::normalize;
pub use refresh::{run_refresh_loop, RefreshOutcome, RefreshPipeline};
pub use source::{DatasetSource, FileSource, HttpSource, MemorySource};
