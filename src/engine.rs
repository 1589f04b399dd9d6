//! Search orchestration: strategy scheduling, matching, and run state

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::AuditConfig;
use crate::digest::DigestAlgorithm;
use crate::monitor::SearchMonitor;
use crate::strategy::{Strategy, StrategyParams};
use crate::targets::TargetSet;
use crate::wordlist::WordSource;

/// Process-wide run state shared between the engine, its workers, and the
/// monitor.
#[derive(Debug)]
pub struct SearchState {
    /// Digest computations performed; incremented exactly once per check
    pub attempts: AtomicU64,
    /// Set once every target is recovered, or on external cancellation
    pub stop: AtomicBool,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            attempts: AtomicU64::new(0),
            stop: AtomicBool::new(false),
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// One identifier's final standing after a run
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub identifier: String,
    pub plaintext: Option<String>,
}

/// Read-only view of a completed run, handed to the reporter
#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    pub entries: Vec<AuditEntry>,
    pub attempts: u64,
    pub elapsed_seconds: f64,
    pub cracked_count: usize,
    pub total_count: usize,
}

impl AuditOutcome {
    pub fn all_cracked(&self) -> bool {
        self.cracked_count == self.total_count
    }

    /// Attempts per second over the whole run; 0 while elapsed is 0
    pub fn rate(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.attempts as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }
}

/// Drives the strategy list against the target set.
///
/// Strategies execute strictly in priority order, one at a time. Within a
/// strategy the candidate stream is drained in batches; with more than one
/// worker thread the batch is checked in parallel, with every worker polling
/// the shared stop flag per candidate so a finished search never drains a
/// large tail.
pub struct SearchEngine {
    targets: Arc<TargetSet>,
    words: Arc<WordSource>,
    algorithm: DigestAlgorithm,
    state: Arc<SearchState>,
    params: StrategyParams,
    threads: usize,
    batch_size: usize,
    start: Instant,
    monitor: Option<Arc<SearchMonitor>>,
}

impl SearchEngine {
    pub fn new(targets: Arc<TargetSet>, words: Arc<WordSource>, config: &AuditConfig) -> Self {
        Self {
            targets,
            words,
            algorithm: config.algorithm,
            state: Arc::new(SearchState::new()),
            params: config.params(),
            threads: config.effective_threads(),
            batch_size: config.batch_size,
            start: Instant::now(),
            monitor: None,
        }
    }

    /// Attach a progress observer
    pub fn with_monitor(mut self, monitor: Arc<SearchMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Shared run state, for monitors and external cancellation
    pub fn state(&self) -> Arc<SearchState> {
        Arc::clone(&self.state)
    }

    /// Request an early stop from outside the run
    pub fn request_stop(&self) {
        self.state.stop.store(true, Ordering::SeqCst);
    }

    fn stop_requested(&self) -> bool {
        self.state.stop.load(Ordering::Relaxed)
    }

    /// Submit one candidate: count the attempt, hash, and record on a hit.
    ///
    /// Returns true iff this call cracked a previously uncracked identifier.
    pub fn check(&self, candidate: &str) -> bool {
        self.state.attempts.fetch_add(1, Ordering::Relaxed);
        let digest = self.algorithm.hex_digest(candidate);
        let Some(identifier) = self.targets.try_record_match(&digest) else {
            return false;
        };
        let identifier = identifier.to_string();
        if !self.targets.record(&identifier, candidate) {
            // Another worker recorded this identifier between lookup and here
            return false;
        }
        info!(identifier = %identifier, candidate = %candidate, "cracked");
        if let Some(monitor) = &self.monitor {
            monitor.record_match(&identifier, candidate);
        }
        if self.targets.all_cracked() {
            self.state.stop.store(true, Ordering::SeqCst);
        }
        true
    }

    /// Run the strategies in the given order until every target is recovered
    /// or the list is exhausted. Exhaustion is normal termination, not an
    /// error.
    pub fn run(&self, strategies: &[Strategy]) -> AuditOutcome {
        if let Some(monitor) = &self.monitor {
            monitor.start();
        }

        for strategy in strategies {
            if self.stop_requested() {
                break;
            }
            let estimated = strategy.estimated_candidates(&self.words, &self.params);
            info!(
                strategy = strategy.name,
                estimated_candidates = estimated,
                "strategy starting"
            );
            if let Some(monitor) = &self.monitor {
                monitor.begin_strategy(strategy.name, estimated);
            }
            self.run_strategy(strategy);
            info!(
                strategy = strategy.name,
                cracked = self.targets.cracked_count(),
                total = self.targets.len(),
                "strategy finished"
            );
        }

        if let Some(monitor) = &self.monitor {
            monitor.finish();
        }
        self.outcome()
    }

    fn run_strategy(&self, strategy: &Strategy) {
        let mut candidates = strategy.candidates(&self.words, &self.params);
        let mut batch: Vec<String> = Vec::with_capacity(self.batch_size);

        loop {
            batch.clear();
            batch.extend(candidates.by_ref().take(self.batch_size));
            if batch.is_empty() {
                return;
            }

            if self.threads <= 1 {
                for candidate in &batch {
                    if self.stop_requested() {
                        return;
                    }
                    self.check(candidate);
                }
            } else {
                batch.par_iter().for_each(|candidate| {
                    if !self.stop_requested() {
                        self.check(candidate);
                    }
                });
            }

            if let Some(monitor) = &self.monitor {
                monitor.update();
            }
            if self.stop_requested() {
                return;
            }
        }
    }

    /// Final read-only view of the run
    pub fn outcome(&self) -> AuditOutcome {
        let entries = self
            .targets
            .entries()
            .into_iter()
            .map(|(identifier, plaintext)| AuditEntry {
                identifier,
                plaintext,
            })
            .collect();
        AuditOutcome {
            entries,
            attempts: self.state.attempts.load(Ordering::SeqCst),
            elapsed_seconds: self.start.elapsed().as_secs_f64(),
            cracked_count: self.targets.cracked_count(),
            total_count: self.targets.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyKind;

    fn engine(hash_lines: &[&str], words: &[&str], threads: usize) -> SearchEngine {
        let targets = Arc::new(TargetSet::from_lines(hash_lines.to_vec(), "test").unwrap());
        let words = Arc::new(WordSource::from_lines(words.to_vec(), "test").unwrap());
        let mut config = AuditConfig::new("hashes.txt", "words.txt");
        config.num_threads = threads;
        SearchEngine::new(targets, words, &config)
    }

    #[test]
    fn test_check_counts_every_attempt() {
        let engine = engine(&["1 aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"], &["x"], 1);
        for candidate in ["a", "b", "c", "hello", "d"] {
            engine.check(candidate);
        }
        assert_eq!(engine.state.attempts.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_check_cracks_on_exact_digest_match_only() {
        let engine = engine(&["1 aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"], &["x"], 1);
        assert!(!engine.check("hellO"));
        assert!(!engine.check("hello "));
        assert!(engine.check("hello"));
        // Already cracked: the same plaintext no longer counts as a new crack
        assert!(!engine.check("hello"));
        let outcome = engine.outcome();
        assert_eq!(outcome.cracked_count, 1);
        assert_eq!(outcome.attempts, 4);
    }

    #[test]
    fn test_check_sets_stop_once_all_cracked() {
        let engine = engine(&["1 aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"], &["x"], 1);
        assert!(!engine.stop_requested());
        engine.check("hello");
        assert!(engine.stop_requested());
    }

    #[test]
    fn test_sequential_run_stops_immediately_after_last_crack() {
        // One word, digest of "0": quick wins reaches it right after the
        // word and word+digit phases.
        let engine = engine(
            &["1 b6589fc6ab0dc82cf12099d1c2d40ab994e8410c"],
            &["hello"],
            1,
        );
        let outcome = engine.run(&[Strategy {
            name: "quick wins",
            kind: StrategyKind::QuickWins,
        }]);
        assert!(outcome.all_cracked());
        // 1 word + 10_000 word+digit + the single "0" check, nothing more
        assert_eq!(outcome.attempts, 1 + 10_000 + 1);
    }

    #[test]
    fn test_remaining_strategies_are_skipped_after_completion() {
        let engine = engine(
            &["1 aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"],
            &["hello"],
            1,
        );
        let strategies = [
            Strategy {
                name: "quick wins",
                kind: StrategyKind::QuickWins,
            },
            Strategy {
                name: "dates",
                kind: StrategyKind::DatePatterns,
            },
        ];
        let outcome = engine.run(&strategies);
        // Cracked by the very first candidate; the date strategy never runs
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.all_cracked());
    }

    #[test]
    fn test_exhaustion_is_normal_termination() {
        let engine = engine(
            &["1 ffffffffffffffffffffffffffffffffffffffff"],
            &["hello"],
            1,
        );
        let outcome = engine.run(&[Strategy {
            name: "dates",
            kind: StrategyKind::DatePatterns,
        }]);
        assert_eq!(outcome.cracked_count, 0);
        assert_eq!(outcome.attempts, 46_500);
        assert!(!outcome.all_cracked());
    }

    #[test]
    fn test_external_stop_halts_the_run() {
        let engine = engine(
            &["1 ffffffffffffffffffffffffffffffffffffffff"],
            &["hello"],
            1,
        );
        engine.request_stop();
        let outcome = engine.run(&[Strategy {
            name: "quick wins",
            kind: StrategyKind::QuickWins,
        }]);
        assert_eq!(outcome.attempts, 0);
    }

    #[test]
    fn test_parallel_run_cracks_the_same_set() {
        let hash_lines = [
            "1 aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
            "2 7c211433f02071597741e6ff5a8ea34789abbf43",
        ];
        let strategies = [Strategy {
            name: "quick wins",
            kind: StrategyKind::QuickWins,
        }];

        let sequential = engine(&hash_lines, &["hello", "world"], 1).run(&strategies);
        let parallel = engine(&hash_lines, &["hello", "world"], 4).run(&strategies);

        let collect = |outcome: &AuditOutcome| {
            let mut cracked: Vec<(String, String)> = outcome
                .entries
                .iter()
                .filter_map(|entry| {
                    entry
                        .plaintext
                        .clone()
                        .map(|plaintext| (entry.identifier.clone(), plaintext))
                })
                .collect();
            cracked.sort();
            cracked
        };
        assert_eq!(collect(&sequential), collect(&parallel));
        assert!(parallel.all_cracked());
    }

    #[test]
    fn test_outcome_rate_is_zero_without_elapsed_time() {
        let outcome = AuditOutcome {
            entries: Vec::new(),
            attempts: 10,
            elapsed_seconds: 0.0,
            cracked_count: 0,
            total_count: 0,
        };
        assert_eq!(outcome.rate(), 0.0);
    }
}
