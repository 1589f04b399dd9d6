//! Progress monitoring and rate/ETA reporting
//!
//! The monitor observes the shared search state; it never influences the
//! outcome of the search, only how often progress is rendered.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::engine::SearchState;
use crate::targets::TargetSet;

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Whether to show a progress bar
    pub show_progress_bar: bool,
    /// Progress bar update interval in milliseconds
    pub update_interval_ms: u64,
    /// Whether to log periodic metrics lines
    pub log_metrics: bool,
    /// Metrics log interval in seconds
    pub log_interval_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            show_progress_bar: true,
            update_interval_ms: 1000,
            log_metrics: true,
            log_interval_seconds: 10,
        }
    }
}

/// A point-in-time snapshot of search progress
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    /// Digest computations so far
    pub attempts: u64,
    /// Wall-clock time since the run started
    pub elapsed: Duration,
    /// Attempts per second; 0 while elapsed is 0
    pub rate: f64,
    pub cracked: usize,
    pub total: usize,
    /// Name of the strategy currently draining, if any
    pub strategy: Option<&'static str>,
    /// Estimated time to drain the current strategy; omitted while the rate
    /// is unknown
    pub eta: Option<Duration>,
}

struct CurrentStrategy {
    name: &'static str,
    estimated: u64,
    attempts_at_start: u64,
}

/// Observer for a running search: progress bar, rate/ETA metrics, and an
/// optional background metrics logging thread.
pub struct SearchMonitor {
    state: Arc<SearchState>,
    targets: Arc<TargetSet>,
    start: Mutex<Instant>,
    is_running: AtomicBool,
    current: Mutex<Option<CurrentStrategy>>,
    progress_bar: Option<ProgressBar>,
    config: MonitorConfig,
}

impl SearchMonitor {
    pub fn new(state: Arc<SearchState>, targets: Arc<TargetSet>, config: MonitorConfig) -> Self {
        let progress_bar = if config.show_progress_bar {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] \
                         {pos}/{len} ({percent}%) {msg}",
                    )
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        Self {
            state,
            targets,
            start: Mutex::new(Instant::now()),
            is_running: AtomicBool::new(false),
            current: Mutex::new(None),
            progress_bar,
            config,
        }
    }

    /// Mark the run as started and reset the clock
    pub fn start(&self) {
        self.is_running.store(true, Ordering::SeqCst);
        *self.start.lock().unwrap() = Instant::now();
        if let Some(pb) = &self.progress_bar {
            pb.reset();
        }
    }

    /// Mark the run as finished; stops the background logger
    pub fn finish(&self) {
        self.is_running.store(false, Ordering::SeqCst);
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("search complete");
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Called by the engine when it moves on to the next strategy
    pub fn begin_strategy(&self, name: &'static str, estimated: u64) {
        let attempts = self.state.attempts.load(Ordering::Relaxed);
        *self.current.lock().unwrap() = Some(CurrentStrategy {
            name,
            estimated,
            attempts_at_start: attempts,
        });
        if let Some(pb) = &self.progress_bar {
            pb.set_length(estimated);
            pb.set_position(0);
            pb.set_message(name);
        }
    }

    /// Called by the engine at batch boundaries to refresh the bar
    pub fn update(&self) {
        let Some(pb) = &self.progress_bar else {
            return;
        };
        let metrics = self.metrics();
        if let Some(current) = self.current.lock().unwrap().as_ref() {
            pb.set_position(metrics.attempts.saturating_sub(current.attempts_at_start));
        }
        let eta = metrics
            .eta
            .map(|eta| format!(", eta {}", utils::format_duration(eta)))
            .unwrap_or_default();
        pb.set_message(format!(
            "{} | cracked {}/{}{}",
            utils::format_rate(metrics.rate),
            metrics.cracked,
            metrics.total,
            eta
        ));
    }

    /// Called by the engine when an identifier is cracked
    pub fn record_match(&self, identifier: &str, candidate: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.println(format!("cracked {}: {:?}", identifier, candidate));
        }
    }

    /// Snapshot of the current progress
    pub fn metrics(&self) -> SearchMetrics {
        let attempts = self.state.attempts.load(Ordering::Relaxed);
        let elapsed = self.start.lock().unwrap().elapsed();
        let rate = if elapsed.as_secs_f64() > 0.0 {
            attempts as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        let (strategy, eta) = match self.current.lock().unwrap().as_ref() {
            Some(current) => {
                let done = attempts.saturating_sub(current.attempts_at_start);
                let remaining = current.estimated.saturating_sub(done);
                let eta = if rate > 0.0 {
                    Some(Duration::from_secs_f64(remaining as f64 / rate))
                } else {
                    None
                };
                (Some(current.name), eta)
            }
            None => (None, None),
        };

        SearchMetrics {
            attempts,
            elapsed,
            rate,
            cracked: self.targets.cracked_count(),
            total: self.targets.len(),
            strategy,
            eta,
        }
    }

    /// Spawn a thread that logs a metrics line every `log_interval_seconds`
    /// until [`SearchMonitor::finish`] is called.
    pub fn spawn_logger(self: &Arc<Self>) -> thread::JoinHandle<()> {
        let monitor = Arc::clone(self);
        thread::spawn(move || {
            let mut last_log = Instant::now();
            let log_interval = Duration::from_secs(monitor.config.log_interval_seconds);
            while monitor.is_running() {
                thread::sleep(Duration::from_millis(monitor.config.update_interval_ms));
                if monitor.config.log_metrics && last_log.elapsed() >= log_interval {
                    let metrics = monitor.metrics();
                    info!(
                        strategy = metrics.strategy.unwrap_or("-"),
                        attempts = metrics.attempts,
                        rate = %utils::format_rate(metrics.rate),
                        cracked = metrics.cracked,
                        total = metrics.total,
                        elapsed = %utils::format_duration(metrics.elapsed),
                        "progress"
                    );
                    last_log = Instant::now();
                }
            }
        })
    }
}

/// Formatting helpers shared by the monitor and the reporter
pub mod utils {
    use std::time::Duration;

    /// Format a duration in a compact human-readable form
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Format a count with thousands separators
    pub fn format_number(value: u64) -> String {
        let digits = value.to_string();
        let mut result = String::new();
        for (i, c) in digits.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }
        result.chars().rev().collect()
    }

    /// Format an attempts-per-second rate with appropriate units
    pub fn format_rate(rate: f64) -> String {
        if rate >= 1_000_000.0 {
            format!("{:.1}M/s", rate / 1_000_000.0)
        } else if rate >= 1_000.0 {
            format!("{:.1}K/s", rate / 1_000.0)
        } else {
            format!("{:.0}/s", rate)
        }
    }
}
