//! In-process dataset source

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use super::{DatasetSource, LineStream};
use crate::error::SourceError;

/// Serves lines held in memory. The content can be replaced between
/// refreshes, which makes it a stand-in for a changing upstream dataset.
#[derive(Clone, Default)]
pub struct MemorySource {
    lines: Arc<RwLock<Vec<String>>>,
}

impl MemorySource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Arc::new(RwLock::new(lines.into_iter().map(Into::into).collect())),
        }
    }

    /// Replace the served lines; later `lines()` calls see the new content.
    pub fn replace<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        match self.lines.write() {
            Ok(mut guard) => *guard = lines,
            Err(poisoned) => *poisoned.into_inner() = lines,
        }
    }

    fn snapshot(&self) -> Vec<String> {
        match self.lines.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl DatasetSource for MemorySource {
    async fn lines(&self) -> Result<LineStream, SourceError> {
        Ok(stream::iter(self.snapshot().into_iter().map(Ok)).boxed())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
