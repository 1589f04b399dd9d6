use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use password_audit::config::AuditConfig;
use password_audit::digest::DigestAlgorithm;
use password_audit::engine::SearchEngine;
use password_audit::monitor::SearchMonitor;
use password_audit::report;
use password_audit::strategy::default_strategies;
use password_audit::targets::TargetSet;
use password_audit::wordlist::WordSource;

#[derive(Parser)]
#[command(name = "password-audit")]
#[command(version, about = "Offline password hash auditing via staged candidate search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recover plaintexts for a file of identifier/digest pairs
    Audit {
        /// Hash file: one "identifier digest" pair per line
        #[arg(short = 'H', long)]
        hashes: Option<String>,

        /// Wordlist: one word per line
        #[arg(short, long)]
        wordlist: Option<String>,

        /// Digest algorithm used to produce the hash file
        #[arg(short, long, value_enum)]
        algorithm: Option<DigestAlgorithm>,

        /// Worker threads (0 = auto-detect)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Write full results as JSON to this path
        #[arg(short, long)]
        output: Option<String>,

        /// Write cracked "identifier plaintext" lines to this path
        #[arg(long)]
        plain_output: Option<String>,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,

        /// Load settings from a JSON config file; flags override it
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Audit {
            hashes,
            wordlist,
            algorithm,
            threads,
            output,
            plain_output,
            no_progress,
            config,
        } => {
            let mut config = match config {
                Some(path) => AuditConfig::from_file(&path)
                    .with_context(|| format!("failed to load config from {}", path))?,
                None => {
                    let hashes = hashes
                        .clone()
                        .context("--hashes is required unless --config is given")?;
                    let wordlist = wordlist
                        .clone()
                        .context("--wordlist is required unless --config is given")?;
                    AuditConfig::new(hashes, wordlist)
                }
            };

            if let Some(hashes) = hashes {
                config.hash_file = hashes;
            }
            if let Some(wordlist) = wordlist {
                config.wordlist = wordlist;
            }
            if let Some(algorithm) = algorithm {
                config.algorithm = algorithm;
            }
            if let Some(threads) = threads {
                config.num_threads = threads;
            }
            if output.is_some() {
                config.output = output;
            }
            if plain_output.is_some() {
                config.plain_output = plain_output;
            }
            if no_progress {
                config.show_progress_bar = false;
            }

            run_audit(config)
        }
    }
}

fn run_audit(config: AuditConfig) -> Result<()> {
    config.validate()?;

    let targets = Arc::new(TargetSet::from_file(&config.hash_file)?);
    let words = Arc::new(WordSource::from_file(&config.wordlist)?);
    info!(
        words = words.len(),
        targets = targets.len(),
        algorithm = %config.algorithm,
        "loaded inputs"
    );

    let threads = config.effective_threads();
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
    info!(threads, "worker pool ready");

    let engine = SearchEngine::new(Arc::clone(&targets), Arc::clone(&words), &config);
    let monitor = Arc::new(SearchMonitor::new(
        engine.state(),
        Arc::clone(&targets),
        config.monitor_config(),
    ));
    let engine = engine.with_monitor(Arc::clone(&monitor));

    monitor.start();
    let logger = monitor.spawn_logger();

    let outcome = engine.run(&default_strategies());
    logger.join().ok();

    report::print_summary(&outcome);
    if let Some(path) = &config.output {
        report::write_json(&outcome, path)?;
        info!(path = %path, "results written");
    }
    if let Some(path) = &config.plain_output {
        report::write_plain(&outcome, path)?;
        info!(path = %path, "plain results written");
    }

    Ok(())
}
