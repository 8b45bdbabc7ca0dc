//! Mention Scan CLI
//!
//! Builds the entity automaton from a dataset and scans text for mentions.
//!
//! # Usage
//!
//! ```bash
//! # Show the normalized form of a name
//! mention-scan normalize "Vladimir Putin"
//!
//! # Scan text against a local dataset
//! mention-scan scan --source data/entities.ftm.json "Putin visited Russia"
//!
//! # Scan stdin lines, one JSON object per line out
//! cat articles.txt | mention-scan scan
//!
//! # Keep the automaton fresh in the background while scanning stdin
//! mention-scan watch
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mention_scan::{
    config::StartupMode, run_refresh_loop, Automaton, MatcherConfig, Mention, RefreshPipeline,
    SnapshotRegistry,
};

#[derive(Parser)]
#[command(name = "mention-scan")]
#[command(version)]
#[command(about = "Find mentions of known entity names in free text")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (YAML); built-in defaults when absent
    #[arg(long, short, global = true, env = "MENTION_SCAN_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized form of each text
    Normalize {
        /// Texts to normalize
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Build the automaton once and scan texts (stdin lines if none given)
    Scan {
        /// Dataset URL or path, overriding the configuration
        #[arg(long, short)]
        source: Option<String>,

        /// Texts to scan
        texts: Vec<String>,
    },

    /// Build the automaton once and print its statistics
    Stats {
        /// Dataset URL or path, overriding the configuration
        #[arg(long, short)]
        source: Option<String>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Refresh in the background and scan stdin lines as they arrive
    Watch {
        /// Dataset URL or path, overriding the configuration
        #[arg(long, short)]
        source: Option<String>,
    },
}

/// One scanned text in the output
#[derive(Serialize)]
struct ScanReport<'a> {
    text: &'a str,
    normalized: Option<&'a str>,
    mentions: Vec<Mention>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mention_scan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { texts } => {
            for text in texts {
                let normalized = mention_scan::normalize(Some(text.as_str()));
                println!("{}", normalized.as_deref().unwrap_or("<none>"));
            }
            Ok(())
        }
        Commands::Scan { source, texts } => {
            let config = load_config(cli.config.as_deref(), source)?;
            let pipeline = RefreshPipeline::from_config(&config)?;
            let snapshot = pipeline
                .build_snapshot()
                .await
                .context("Failed to build automaton")?;

            if texts.is_empty() {
                for line in io::stdin().lock().lines() {
                    let line = line.context("Failed to read stdin")?;
                    print_scan(snapshot.automaton(), &line)?;
                }
            } else {
                for text in &texts {
                    print_scan(snapshot.automaton(), text)?;
                }
            }
            Ok(())
        }
        Commands::Stats { source, json } => {
            let config = load_config(cli.config.as_deref(), source)?;
            let pipeline = RefreshPipeline::from_config(&config)?;
            let snapshot = pipeline
                .build_snapshot()
                .await
                .context("Failed to build automaton")?;

            let stats = snapshot.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", stats);
            }
            Ok(())
        }
        Commands::Watch { source } => {
            let config = load_config(cli.config.as_deref(), source)?;
            watch(config).await
        }
    }
}

fn load_config(path: Option<&str>, source: Option<String>) -> anyhow::Result<MatcherConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::info!(path = %path, "Loading configuration");
            MatcherConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path))?
        }
        None => MatcherConfig::default(),
    };

    if let Some(location) = source {
        config.source.location = location;
    }

    tracing::info!(
        source = %config.source.location,
        refresh_interval = config.refresh.interval_secs,
        "Configuration loaded"
    );
    Ok(config)
}

fn print_scan(automaton: &Automaton, text: &str) -> anyhow::Result<()> {
    let scan = automaton.query(text);
    let report = ScanReport {
        text,
        normalized: scan.normalized(),
        mentions: scan.mentions(),
    };
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}

async fn watch(config: MatcherConfig) -> anyhow::Result<()> {
    let registry = Arc::new(SnapshotRegistry::new());

    match config.refresh.startup_mode {
        StartupMode::Sync => {
            tracing::info!("Performing synchronous initial build");
            let pipeline = RefreshPipeline::from_config(&config)?;
            pipeline
                .refresh(&registry)
                .await
                .context("Initial build failed")?;
            tracing::info!("Initial build complete, automaton ready");
        }
        StartupMode::Async => {
            tracing::info!("Starting asynchronous initial build");
            let pipeline = RefreshPipeline::from_config(&config)?;
            let reg = registry.clone();
            tokio::spawn(async move {
                if let Err(e) = pipeline.refresh(&reg).await {
                    tracing::error!(error = %e, "Initial async build failed");
                } else {
                    tracing::info!("Initial async build complete");
                }
            });
        }
    }

    // Start background refresh loop
    let refresh_pipeline = RefreshPipeline::from_config(&config)?;
    let refresh_registry = registry.clone();
    let refresh_interval = config.refresh.interval_secs;
    tokio::spawn(async move {
        run_refresh_loop(refresh_pipeline, refresh_registry, refresh_interval).await;
    });

    // Scan stdin on a blocking thread, each line against the current snapshot
    let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(64);
    tokio::task::spawn_blocking(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    while let Some(line) = rx.recv().await {
        match registry.current().await {
            Ok(snapshot) => print_scan(snapshot.automaton(), &line)?,
            Err(e) => tracing::warn!(error = %e, "Skipping input"),
        }
    }

    Ok(())
}
