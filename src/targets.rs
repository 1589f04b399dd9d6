//! Target hash records and shared cracked-state tracking

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{InputError, Result};

/// A single identifier/digest pair from the hash file.
///
/// `target_digest` is immutable once loaded; the recovered plaintext is set
/// at most once and never reset.
#[derive(Debug)]
pub struct HashRecord {
    pub identifier: String,
    /// Lowercase hex digest of the password being searched for
    pub target_digest: String,
    cracked: Mutex<Option<String>>,
}

impl HashRecord {
    fn new(identifier: String, target_digest: String) -> Self {
        Self {
            identifier,
            target_digest,
            cracked: Mutex::new(None),
        }
    }

    /// The recovered plaintext, if this record has been cracked
    pub fn cracked_value(&self) -> Option<String> {
        self.cracked.lock().unwrap().clone()
    }

    pub fn is_cracked(&self) -> bool {
        self.cracked.lock().unwrap().is_some()
    }
}

/// The set of digests under audit, with a reverse digest lookup for O(1)
/// match checks.
///
/// If two identifiers share a digest, the first one in load order owns the
/// reverse-map entry: a matching candidate is credited to that identifier
/// only, and the later duplicate is reported at load time.
#[derive(Debug)]
pub struct TargetSet {
    records: Vec<HashRecord>,
    by_digest: HashMap<String, usize>,
    by_identifier: HashMap<String, usize>,
    cracked_count: AtomicUsize,
}

impl TargetSet {
    /// Load a hash file: one `identifier digest` pair per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let file = File::open(path).map_err(|source| InputError::MissingFile {
            path: label.clone(),
            source,
        })?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()?;
        Self::from_lines(lines, &label)
    }

    /// Build a target set from in-memory lines. `path` is only used for
    /// error reporting.
    ///
    /// Blank lines and lines that do not split into exactly two
    /// whitespace-separated tokens are skipped. A two-token line whose digest
    /// is not plain hex fails the whole load.
    pub fn from_lines<I, S>(lines: I, path: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records: Vec<HashRecord> = Vec::new();
        let mut by_digest: HashMap<String, usize> = HashMap::new();
        let mut by_identifier: HashMap<String, usize> = HashMap::new();

        for (line_no, raw) in lines.into_iter().enumerate() {
            let line = raw.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let (identifier, digest) = match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(identifier), Some(digest), None) => (identifier, digest),
                _ => {
                    debug!(
                        line = line_no + 1,
                        content = line,
                        "skipping line without exactly two tokens"
                    );
                    continue;
                }
            };

            if !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(InputError::MalformedLine {
                    path: path.to_string(),
                    line: line_no + 1,
                    content: line.to_string(),
                }
                .into());
            }

            if by_identifier.contains_key(identifier) {
                warn!(identifier, "duplicate identifier, keeping the first entry");
                continue;
            }

            let digest = digest.to_ascii_lowercase();
            let index = records.len();
            if let Some(&first) = by_digest.get(&digest) {
                warn!(
                    first = %records[first].identifier,
                    duplicate = identifier,
                    "identifiers share a digest; matches credit the first"
                );
            } else {
                by_digest.insert(digest.clone(), index);
            }
            by_identifier.insert(identifier.to_string(), index);
            records.push(HashRecord::new(identifier.to_string(), digest));
        }

        if records.is_empty() {
            return Err(InputError::NoRecords {
                path: path.to_string(),
            }
            .into());
        }

        Ok(Self {
            records,
            by_digest,
            by_identifier,
            cracked_count: AtomicUsize::new(0),
        })
    }

    /// Look up a computed digest. Returns the matching identifier if the
    /// digest is known and that identifier is not yet cracked; the caller
    /// still has to supply the plaintext via [`TargetSet::record`].
    ///
    /// Comparison is case-insensitive on the hex digits. Idempotent: a second
    /// match for an already-cracked identifier returns `None`.
    pub fn try_record_match(&self, digest: &str) -> Option<&str> {
        let key = if digest.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(digest.to_ascii_lowercase())
        } else {
            Cow::Borrowed(digest)
        };
        let &index = self.by_digest.get(key.as_ref())?;
        let record = &self.records[index];
        if record.is_cracked() {
            return None;
        }
        Some(record.identifier.as_str())
    }

    /// Record the recovered plaintext for an identifier.
    ///
    /// First writer wins: the value is set exactly once, also under
    /// concurrent calls, and any later call is a no-op. Returns true iff this
    /// call set the value.
    pub fn record(&self, identifier: &str, candidate: &str) -> bool {
        let Some(&index) = self.by_identifier.get(identifier) else {
            return false;
        };
        let mut slot = self.records[index].cracked.lock().unwrap();
        if slot.is_some() {
            return false;
        }
        *slot = Some(candidate.to_string());
        self.cracked_count.fetch_add(1, Ordering::SeqCst);
        true
    }

    /// True iff every record has a recovered plaintext
    pub fn all_cracked(&self) -> bool {
        self.cracked_count.load(Ordering::SeqCst) == self.records.len()
    }

    pub fn cracked_count(&self) -> usize {
        self.cracked_count.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in load order
    pub fn records(&self) -> &[HashRecord] {
        &self.records
    }

    /// Read-only `(identifier, plaintext)` view for reporting
    pub fn entries(&self) -> Vec<(String, Option<String>)> {
        self.records
            .iter()
            .map(|record| (record.identifier.clone(), record.cracked_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_set() -> TargetSet {
        TargetSet::from_lines(
            [
                "1 aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
                "2 92cfceb39d57d914ed8b14d0e37643de0797ae56",
            ],
            "test",
        )
        .unwrap()
    }

    #[test]
    fn test_load_normalizes_digest_case() {
        let set = TargetSet::from_lines(["1 AAF4C61DDCC5E8A2DABEDE0F3B482CD9AEA9434D"], "test")
            .unwrap();
        assert_eq!(
            set.records()[0].target_digest,
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
        assert!(set
            .try_record_match("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d")
            .is_some());
    }

    #[test]
    fn test_one_token_line_is_skipped_silently() {
        let set = TargetSet::from_lines(
            ["userX", "1 aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d", ""],
            "test",
        )
        .unwrap();
        assert_eq!(set.len(), 1);
        assert!(!set.by_identifier.contains_key("userX"));
    }

    #[test]
    fn test_three_token_line_is_skipped() {
        let set = TargetSet::from_lines(
            [
                "a b c",
                "1 aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
            ],
            "test",
        )
        .unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_non_hex_digest_fails_the_load() {
        let err = TargetSet::from_lines(["1 nothex!"], "hashes.txt").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("hashes.txt:1"));
        assert!(message.contains("nothex!"));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = TargetSet::from_lines(["", "only-one-token"], "hashes.txt").unwrap_err();
        assert!(err.to_string().contains("no hash records"));
    }

    #[test]
    fn test_match_then_record() {
        let set = small_set();
        let identifier = set
            .try_record_match("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d")
            .unwrap()
            .to_string();
        assert_eq!(identifier, "1");
        assert!(set.record(&identifier, "hello"));
        assert_eq!(set.records()[0].cracked_value().as_deref(), Some("hello"));
        assert_eq!(set.cracked_count(), 1);

        // Same digest again: identifier is already cracked
        assert!(set
            .try_record_match("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d")
            .is_none());
    }

    #[test]
    fn test_unknown_digest_does_not_match() {
        let set = small_set();
        assert!(set.try_record_match("da39a3ee5e6b4b0d3255bfef95601890afd80709").is_none());
    }

    #[test]
    fn test_record_is_first_writer_wins() {
        let set = small_set();
        assert!(set.record("1", "a"));
        assert!(!set.record("1", "b"));
        assert_eq!(set.records()[0].cracked_value().as_deref(), Some("a"));
        assert_eq!(set.cracked_count(), 1);
    }

    #[test]
    fn test_all_cracked_transitions_exactly_at_full_coverage() {
        let set = small_set();
        assert!(!set.all_cracked());
        set.record("1", "hello");
        assert!(!set.all_cracked());
        set.record("2", "42");
        assert!(set.all_cracked());
    }

    #[test]
    fn test_duplicate_digest_credits_first_identifier() {
        let set = TargetSet::from_lines(
            [
                "alice aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
                "bob aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
            ],
            "test",
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.try_record_match("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"),
            Some("alice")
        );
        set.record("alice", "hello");
        assert!(set
            .try_record_match("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d")
            .is_none());
        assert!(!set.records()[1].is_cracked());
        assert!(!set.all_cracked());
    }

    #[test]
    fn test_concurrent_record_has_a_single_winner() {
        use std::sync::Arc;
        use std::thread;

        let set = Arc::new(small_set());
        let mut handles = Vec::new();
        for value in ["a", "b", "c", "d"] {
            let set = Arc::clone(&set);
            handles.push(thread::spawn(move || set.record("1", value)));
        }
        let wins: usize = handles
            .into_iter()
            .map(|handle| handle.join().unwrap() as usize)
            .sum();
        assert_eq!(wins, 1);
        assert_eq!(set.cracked_count(), 1);
        assert!(set.records()[0].cracked_value().is_some());
    }
}
