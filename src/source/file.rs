//! Local file dataset source

use std::path::PathBuf;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use super::{DatasetSource, LineStream};
use crate::error::SourceError;

/// Reads a JSON-lines dataset from disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn lines(&self) -> Result<LineStream, SourceError> {
        info!(path = %self.path.display(), "Reading dataset");

        let file = File::open(&self.path).await?;
        let lines = BufReader::new(file).lines();

        let stream = stream::unfold(Some(lines), |lines| async move {
            let mut lines = lines?;
            match lines.next_line().await {
                Ok(Some(line)) => Some((Ok(line), Some(lines))),
                Ok(None) => None,
                Err(e) => Some((Err(SourceError::from(e)), None)),
            }
        });

        Ok(stream.boxed())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
