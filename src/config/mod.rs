//! Configuration module for the mention scanner

mod matcher_config;

pub use matcher_config::{
    MatcherConfig, RefreshConfig, SourceConfig, SourceLocation, StartupMode, DEFAULT_DATASET_URL,
};
