//! Offline password hash auditing
//!
//! Recovers plaintext passwords for a set of known digests by running an
//! ordered list of candidate-generation strategies (dictionary words,
//! word/digit compositions, date patterns, sampled numeric ranges) against a
//! wordlist, hashing every candidate and matching it against the loaded
//! targets. The search stops as soon as every target is recovered.

pub mod config;
pub mod digest;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod report;
pub mod strategy;
pub mod targets;
pub mod wordlist;

pub use config::AuditConfig;
pub use digest::DigestAlgorithm;
pub use engine::{AuditEntry, AuditOutcome, SearchEngine, SearchState};
pub use error::*;
pub use monitor::{MonitorConfig, SearchMetrics, SearchMonitor};
pub use strategy::{default_strategies, Strategy, StrategyKind, StrategyParams};
pub use targets::{HashRecord, TargetSet};
pub use wordlist::WordSource;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::AuditConfig;
    pub use crate::digest::DigestAlgorithm;
    pub use crate::engine::{AuditOutcome, SearchEngine};
    pub use crate::error::*;
    pub use crate::monitor::{MonitorConfig, SearchMonitor};
    pub use crate::strategy::default_strategies;
    pub use crate::targets::TargetSet;
    pub use crate::wordlist::WordSource;
    pub use anyhow::Context;
}


/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of candidates drained per batch
pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Default word-prefix bound for the extended digit strategies
pub const DEFAULT_TOP_WORDS: usize = 500;
