//! Scanner configuration parsing
//!
//! Loads the dataset source, refresh behaviour and (optionally) the schema
//! model from YAML and provides strongly-typed access to them. Every
//! section has defaults, so an empty document is a valid configuration.

use serde::Deserialize;
use url::Url;

use crate::dictionary::SchemaModel;
use crate::error::ConfigError;

/// Default dataset: the OpenSanctions consolidated sanctions list
pub const DEFAULT_DATASET_URL: &str =
    "https://data.opensanctions.org/datasets/latest/sanctions/entities.ftm.json";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Overrides the built-in schema model when present
    #[serde(default)]
    pub schema: Option<SchemaModel>,
}

/// Where entity records come from
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// `http(s)://` URL or filesystem path of a JSON-lines dataset
    #[serde(default = "default_location")]
    pub location: String,
    /// Connect and response-header timeout for HTTP sources
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_location() -> String {
    DEFAULT_DATASET_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

/// Resolved form of [`SourceConfig::location`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Http(Url),
    File(std::path::PathBuf),
}

impl SourceConfig {
    /// Classify the configured location.
    ///
    /// Anything that parses as an `http`/`https` URL is fetched over the
    /// network, `file://` URLs and plain strings are read from disk.
    pub fn resolve(&self) -> Result<SourceLocation, ConfigError> {
        let location = self.location.trim();
        if location.is_empty() {
            return Err(ConfigError::InvalidSource {
                location: self.location.clone(),
                message: "location is empty".to_string(),
            });
        }

        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(SourceLocation::Http(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(SourceLocation::File)
                .map_err(|_| ConfigError::InvalidSource {
                    location: self.location.clone(),
                    message: "file URL does not map to a local path".to_string(),
                }),
            // Single letters are Windows drive prefixes, not schemes
            Ok(url) if url.scheme().len() > 1 => Err(ConfigError::InvalidSource {
                location: self.location.clone(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            _ => Ok(SourceLocation::File(location.into())),
        }
    }
}

/// Configuration for snapshot refresh behavior
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub startup_mode: StartupMode,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            startup_mode: StartupMode::default(),
        }
    }
}

fn default_interval_secs() -> u64 {
    86_400
}

/// Startup mode for the first snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupMode {
    /// Build in the background; queries fail with `NotReady` until done
    Async,
    /// Block until the first snapshot is installed
    #[default]
    Sync,
}

impl MatcherConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: MatcherConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Configured schema model, or the built-in one
    pub fn schema_model(&self) -> SchemaModel {
        self.schema.clone().unwrap_or_default()
    }
}
