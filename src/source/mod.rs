//! Dataset sources
//!
//! A source produces the raw JSON lines of one dataset snapshot. Transport
//! failures surface as [`SourceError`] items and abort the build that is
//! consuming the stream; parsing the lines is left to the dictionary.

mod file;
mod http;
mod lines;
mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::config::{SourceConfig, SourceLocation};
use crate::error::{Error, SourceError};

pub use file::FileSource;
pub use http::HttpSource;
pub use lines::split_lines;
pub use memory::MemorySource;

/// Stream of raw dataset lines
pub type LineStream = BoxStream<'static, Result<String, SourceError>>;

/// A provider of entity record lines
///
/// Implementations must be Send + Sync so one source can serve the
/// background refresh loop.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Open the dataset and stream its lines.
    async fn lines(&self) -> Result<LineStream, SourceError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Create the source described by the configuration.
pub fn source_from_config(config: &SourceConfig) -> Result<Arc<dyn DatasetSource>, Error> {
    let source: Arc<dyn DatasetSource> = match config.resolve()? {
        SourceLocation::Http(url) => Arc::new(HttpSource::new(
            url,
            Duration::from_secs(config.timeout_secs),
        )?),
        SourceLocation::File(path) => Arc::new(FileSource::new(path)),
    };
    Ok(source)
}
