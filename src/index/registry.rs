//! Registry holding the live automaton snapshot
//!
//! Scanners take a clone of the current `Arc` and scan without holding the
//! lock. Installing a new snapshot swaps the `Arc`; scans already running
//! keep the snapshot they started with until they drop it.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::snapshot::AutomatonSnapshot;
use crate::automaton::Mention;
use crate::error::MatchError;

#[derive(Default)]
pub struct SnapshotRegistry {
    current: RwLock<Option<Arc<AutomatonSnapshot>>>,
}

impl SnapshotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the snapshot new scans should use
    ///
    /// Returns `NotReady` until the first snapshot is installed.
    pub async fn current(&self) -> Result<Arc<AutomatonSnapshot>, MatchError> {
        self.current.read().await.clone().ok_or(MatchError::NotReady)
    }

    /// Replace the current snapshot, returning the previous one.
    pub async fn install(&self, snapshot: Arc<AutomatonSnapshot>) -> Option<Arc<AutomatonSnapshot>> {
        info!(
            fingerprint = %snapshot.fingerprint(),
            built_at = %snapshot.built_at().to_rfc3339(),
            patterns = snapshot.automaton().pattern_count(),
            "Installing automaton snapshot"
        );
        self.current.write().await.replace(snapshot)
    }

    /// Check if a snapshot is installed
    pub async fn is_ready(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Fingerprint of the installed snapshot
    pub async fn fingerprint(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.fingerprint().to_string())
    }

    /// Normalize and scan raw text against the current snapshot
    pub async fn find_mentions(&self, raw: &str) -> Result<Vec<Mention>, MatchError> {
        let snapshot = self.current().await?;
        Ok(snapshot.find_mentions(raw))
    }
}
