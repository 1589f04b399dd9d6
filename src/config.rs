//! Configuration types and parsing

use serde::{Deserialize, Serialize};

use crate::digest::DigestAlgorithm;
use crate::error::{ConfigError, Result};
use crate::monitor::MonitorConfig;
use crate::strategy::StrategyParams;

/// Main configuration for an audit run.
///
/// Can be loaded from a JSON file or assembled from command-line flags; the
/// `validate` pass runs before anything is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Path to the hash file: one `identifier digest` pair per line
    pub hash_file: String,

    /// Path to the wordlist: one word per line
    pub wordlist: String,

    /// Digest algorithm matching the hash file
    #[serde(default)]
    pub algorithm: DigestAlgorithm,

    /// Worker threads for strategy-internal parallelism; 0 = auto-detect
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,

    /// Candidates drained per batch; also the granularity of progress updates
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Word-prefix bound for the extended digit strategies
    #[serde(default = "default_top_words")]
    pub top_words: usize,

    /// Lengths for the zero-padded number strategy
    #[serde(default = "default_padded_lengths")]
    pub padded_lengths: Vec<usize>,

    /// Whether to show a progress bar
    #[serde(default = "default_true")]
    pub show_progress_bar: bool,

    /// Progress bar update interval in milliseconds
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Metrics log interval in seconds
    #[serde(default = "default_log_interval_seconds")]
    pub log_interval_seconds: u64,

    /// Optional path for the JSON results file
    #[serde(default)]
    pub output: Option<String>,

    /// Optional path for a plain `identifier plaintext` results file
    #[serde(default)]
    pub plain_output: Option<String>,
}

fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_batch_size() -> usize {
    crate::DEFAULT_BATCH_SIZE
}

fn default_top_words() -> usize {
    crate::DEFAULT_TOP_WORDS
}

fn default_padded_lengths() -> Vec<usize> {
    vec![4, 6, 8]
}

fn default_true() -> bool {
    true
}

fn default_update_interval_ms() -> u64 {
    1000
}

fn default_log_interval_seconds() -> u64 {
    10
}

impl AuditConfig {
    /// Build a configuration with defaults for everything but the two input
    /// paths
    pub fn new(hash_file: impl Into<String>, wordlist: impl Into<String>) -> Self {
        Self {
            hash_file: hash_file.into(),
            wordlist: wordlist.into(),
            algorithm: DigestAlgorithm::default(),
            num_threads: default_num_threads(),
            batch_size: default_batch_size(),
            top_words: default_top_words(),
            padded_lengths: default_padded_lengths(),
            show_progress_bar: true,
            update_interval_ms: default_update_interval_ms(),
            log_interval_seconds: default_log_interval_seconds(),
            output: None,
            plain_output: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AuditConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AuditConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size).into());
        }
        if self.top_words == 0 {
            return Err(ConfigError::InvalidTopWords(self.top_words).into());
        }
        for &length in &self.padded_lengths {
            if length == 0 || length > 10 {
                return Err(ConfigError::InvalidPaddedLength(length).into());
            }
        }
        if self.update_interval_ms == 0 {
            return Err(ConfigError::InvalidProgressInterval(self.update_interval_ms).into());
        }
        Ok(())
    }

    /// Worker thread count with 0 resolved to the machine's parallelism
    pub fn effective_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }

    /// Strategy bounds derived from this configuration
    pub fn params(&self) -> StrategyParams {
        StrategyParams {
            top_words: self.top_words,
            padded_lengths: self.padded_lengths.clone(),
        }
    }

    /// Monitor settings derived from this configuration
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            show_progress_bar: self.show_progress_bar,
            update_interval_ms: self.update_interval_ms,
            log_metrics: true,
            log_interval_seconds: self.log_interval_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_gets_defaults() {
        let config = AuditConfig::from_json(
            r#"{ "hash_file": "hashes.txt", "wordlist": "words.txt" }"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, DigestAlgorithm::Sha1);
        assert_eq!(config.batch_size, crate::DEFAULT_BATCH_SIZE);
        assert_eq!(config.top_words, crate::DEFAULT_TOP_WORDS);
        assert_eq!(config.padded_lengths, vec![4, 6, 8]);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_algorithm_from_json() {
        let config = AuditConfig::from_json(
            r#"{ "hash_file": "h", "wordlist": "w", "algorithm": "sha256" }"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, DigestAlgorithm::Sha256);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let err = AuditConfig::from_json(
            r#"{ "hash_file": "h", "wordlist": "w", "batch_size": 0 }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("batch size"));
    }

    #[test]
    fn test_out_of_range_padded_length_is_rejected() {
        let mut config = AuditConfig::new("h", "w");
        config.padded_lengths = vec![4, 11];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_progress_interval_is_rejected() {
        let mut config = AuditConfig::new("h", "w");
        config.update_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_threads_resolves_zero() {
        let mut config = AuditConfig::new("h", "w");
        config.num_threads = 0;
        assert!(config.effective_threads() >= 1);
        config.num_threads = 3;
        assert_eq!(config.effective_threads(), 3);
    }
}
