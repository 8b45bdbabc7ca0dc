//! Error types for the mention scanner
//!
//! One enum per concern, joined by the crate-level [`Error`]. Only source
//! failures abort a build; malformed records and names that do not
//! normalize are skipped by the pipeline.

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset source error: {0}")]
    Source(#[from] SourceError),

    #[error("Refresh error: {0}")]
    Refresh(#[from] RefreshError),

    #[error("Match error: {0}")]
    Match(#[from] MatchError),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid source location '{location}': {message}")]
    InvalidSource { location: String, message: String },
}

/// Failures of the dataset source. Fatal to the current build attempt.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dataset request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Dataset request to {url} got no response within {timeout:?}")]
    Timeout { url: String, timeout: std::time::Duration },

    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

/// A single entity record that cannot be used. The record is skipped.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Errors raised while rebuilding and installing a snapshot
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Automaton build task failed: {0}")]
    BuildTask(#[from] tokio::task::JoinError),
}

/// Errors raised on the query path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("No automaton snapshot has been installed yet")]
    NotReady,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
