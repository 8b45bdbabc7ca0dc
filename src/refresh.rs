//! Refresh pipeline: dataset -> dictionary -> automaton -> registry
//!
//! Every refresh builds a complete new snapshot off to the side and swaps it
//! in only when it finished. A failed refresh leaves whatever was installed
//! before untouched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::automaton::PatternEntry;
use crate::config::MatcherConfig;
use crate::dictionary::{DictionaryBuilder, DictionaryStats, SchemaIndex};
use crate::error::{Error, RefreshError};
use crate::index::{fingerprint, AutomatonSnapshot, SnapshotRegistry};
use crate::source::{source_from_config, DatasetSource};

/// What a refresh did to the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was installed
    Installed { fingerprint: String, patterns: usize },
    /// The dataset produced the same patterns as the installed snapshot
    Unchanged { fingerprint: String },
}

pub struct RefreshPipeline {
    source: Arc<dyn DatasetSource>,
    schema: Arc<SchemaIndex>,
}

impl RefreshPipeline {
    pub fn new(source: Arc<dyn DatasetSource>, schema: SchemaIndex) -> Self {
        Self {
            source,
            schema: Arc::new(schema),
        }
    }

    /// Create the pipeline for the configured source and schema model
    pub fn from_config(config: &MatcherConfig) -> Result<Self, Error> {
        let source = source_from_config(&config.source)?;
        Ok(Self::new(source, config.schema_model().index()))
    }

    pub fn source(&self) -> &Arc<dyn DatasetSource> {
        &self.source
    }

    /// Read the whole dataset into pattern entries.
    ///
    /// Malformed records are skipped. The first source error aborts the pass.
    async fn collect_entries(&self) -> Result<(Vec<PatternEntry>, DictionaryStats), RefreshError> {
        info!(source = %self.source.describe(), "Building dictionary");

        let mut lines = self.source.lines().await?;
        let mut builder = DictionaryBuilder::new(self.schema.as_ref());

        while let Some(line) = lines.next().await {
            let line = line?;
            // Malformed lines are counted and logged by the builder
            let _ = builder.add_line(&line);
        }

        let (entries, stats) = builder.finish();
        if stats.records_malformed > 0 {
            warn!(
                malformed = stats.records_malformed,
                "Skipped malformed entity records"
            );
        }
        info!(
            records = stats.records_seen,
            indexed = stats.records_indexed,
            not_legal_entity = stats.records_not_legal_entity,
            non_latin = stats.names_non_latin,
            patterns = stats.patterns,
            "Dictionary complete"
        );

        Ok((entries, stats))
    }

    async fn build(
        &self,
        entries: Vec<PatternEntry>,
        stats: DictionaryStats,
    ) -> Result<AutomatonSnapshot, RefreshError> {
        let source = self.source.describe();
        let snapshot = tokio::task::spawn_blocking(move || {
            AutomatonSnapshot::build(entries, stats, source)
        })
        .await?;
        Ok(snapshot)
    }

    /// Build a snapshot without installing it
    pub async fn build_snapshot(&self) -> Result<AutomatonSnapshot, RefreshError> {
        let (entries, stats) = self.collect_entries().await?;
        self.build(entries, stats).await
    }

    /// Rebuild from the source and install the result.
    ///
    /// The install is skipped when the patterns are identical to the
    /// installed snapshot.
    pub async fn refresh(&self, registry: &SnapshotRegistry) -> Result<RefreshOutcome, RefreshError> {
        let start = Instant::now();
        let (entries, stats) = self.collect_entries().await?;

        let new_fingerprint = fingerprint(&entries);
        if registry.fingerprint().await.as_deref() == Some(new_fingerprint.as_str()) {
            info!(
                fingerprint = %new_fingerprint,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Dataset unchanged, keeping current snapshot"
            );
            return Ok(RefreshOutcome::Unchanged {
                fingerprint: new_fingerprint,
            });
        }

        let snapshot = self.build(entries, stats).await?;
        let patterns = snapshot.automaton().pattern_count();
        let fingerprint = snapshot.fingerprint().to_string();
        registry.install(Arc::new(snapshot)).await;

        info!(
            patterns,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Refresh complete"
        );

        Ok(RefreshOutcome::Installed {
            fingerprint,
            patterns,
        })
    }
}

/// Refresh the registry every `interval_secs` seconds, forever.
///
/// Call inside `tokio::spawn`. Failures are logged and the previous snapshot
/// stays in service until the next tick.
pub async fn run_refresh_loop(
    pipeline: RefreshPipeline,
    registry: Arc<SnapshotRegistry>,
    interval_secs: u64,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
    // Skip the first immediate tick
    ticker.tick().await;

    info!(
        interval_secs,
        source = %pipeline.source().describe(),
        "Refresh loop started"
    );

    loop {
        ticker.tick().await;

        if let Err(e) = pipeline.refresh(&registry).await {
            error!(error = %e, "Scheduled refresh failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MatchError, SourceError};
    use crate::source::{LineStream, MemorySource};
    use async_trait::async_trait;
    use futures::stream;

    const PUTIN: &str =
        r#"{"id": "E1", "schema": "Person", "properties": {"name": ["Vladimir Putin"]}}"#;
    const RUSSIA: &str =
        r#"{"id": "E2", "schema": "PublicBody", "properties": {"name": ["Russia"]}}"#;
    const UKRAINE: &str =
        r#"{"id": "E3", "schema": "PublicBody", "properties": {"name": ["Ukraine"]}}"#;

    /// Yields some lines, then fails
    struct BrokenSource;

    #[async_trait]
    impl DatasetSource for BrokenSource {
        async fn lines(&self) -> Result<LineStream, SourceError> {
            let items = vec![
                Ok(UKRAINE.to_string()),
                Err(SourceError::Status {
                    url: "http://test".to_string(),
                    status: 503,
                }),
            ];
            Ok(stream::iter(items).boxed())
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn pipeline(source: &MemorySource) -> RefreshPipeline {
        RefreshPipeline::new(Arc::new(source.clone()), SchemaIndex::default())
    }

    #[tokio::test]
    async fn test_refresh_installs_snapshot() {
        let source = MemorySource::new([PUTIN, RUSSIA, "not json", ""]);
        let registry = SnapshotRegistry::new();

        let outcome = pipeline(&source).refresh(&registry).await.unwrap();
        assert!(matches!(outcome, RefreshOutcome::Installed { patterns: 2, .. }));

        let snapshot = registry.current().await.unwrap();
        let stats = snapshot.stats();
        assert_eq!(stats.dictionary.records_seen, 3);
        assert_eq!(stats.dictionary.records_malformed, 1);
        assert_eq!(stats.source, "memory");

        let mentions = registry
            .find_mentions("My name is Vladimir Putin, I am the president of Russia.")
            .await
            .unwrap();
        assert_eq!(mentions.len(), 2);
    }

    #[tokio::test]
    async fn test_unchanged_dataset_skips_install() {
        let source = MemorySource::new([PUTIN, RUSSIA]);
        let registry = SnapshotRegistry::new();
        let pipeline = pipeline(&source);

        pipeline.refresh(&registry).await.unwrap();
        let first = registry.current().await.unwrap();

        let outcome = pipeline.refresh(&registry).await.unwrap();
        assert!(matches!(outcome, RefreshOutcome::Unchanged { .. }));
        assert!(Arc::ptr_eq(&first, &registry.current().await.unwrap()));
    }

    #[tokio::test]
    async fn test_changed_dataset_swaps_snapshot() {
        let source = MemorySource::new([PUTIN]);
        let registry = SnapshotRegistry::new();
        let pipeline = pipeline(&source);

        pipeline.refresh(&registry).await.unwrap();
        let old = registry.current().await.unwrap();

        source.replace([PUTIN, UKRAINE]);
        let outcome = pipeline.refresh(&registry).await.unwrap();
        assert!(matches!(outcome, RefreshOutcome::Installed { patterns: 2, .. }));

        assert!(old.find_mentions("Ukraine").is_empty());
        assert_eq!(registry.find_mentions("Ukraine").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_source_failure_keeps_previous_snapshot() {
        let source = MemorySource::new([RUSSIA]);
        let registry = SnapshotRegistry::new();
        pipeline(&source).refresh(&registry).await.unwrap();
        let before = registry.fingerprint().await;

        let broken = RefreshPipeline::new(Arc::new(BrokenSource), SchemaIndex::default());
        let err = broken.refresh(&registry).await.unwrap_err();
        assert!(matches!(
            err,
            RefreshError::Source(SourceError::Status { status: 503, .. })
        ));

        assert_eq!(registry.fingerprint().await, before);
        assert_eq!(registry.find_mentions("Russia").await.unwrap().len(), 1);
        assert!(registry.find_mentions("Ukraine").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_first_build_leaves_registry_not_ready() {
        let registry = SnapshotRegistry::new();
        let broken = RefreshPipeline::new(Arc::new(BrokenSource), SchemaIndex::default());
        assert!(broken.refresh(&registry).await.is_err());
        assert_eq!(registry.current().await.unwrap_err(), MatchError::NotReady);
    }

    #[tokio::test]
    async fn test_empty_dataset_builds_empty_automaton() {
        let source = MemorySource::new(Vec::<String>::new());
        let snapshot = pipeline(&source).build_snapshot().await.unwrap();
        assert!(snapshot.automaton().is_empty());
        assert!(snapshot.find_mentions("Vladimir Putin").is_empty());
    }
}
