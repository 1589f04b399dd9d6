//! Wordlist loading and bounded views over it

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{InputError, Result};

/// An ordered sequence of lowercase words, loaded once and read-only for the
/// remainder of the run.
///
/// Duplicates from the input file are preserved so that the sequence mirrors
/// the wordlist's own ordering; strategies that want "the most common words"
/// take a bounded prefix of it.
#[derive(Debug)]
pub struct WordSource {
    words: Vec<String>,
}

impl WordSource {
    /// Load a wordlist file: one word per line, trimmed and lowercased,
    /// blank lines skipped.
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

    /// Build a word source from in-memory lines. `path` is only used for
    /// error reporting.
    pub fn from_lines<I, S>(lines: I, path: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = lines
            .into_iter()
            .filter_map(|line| {
                let word = line.as_ref().trim();
                if word.is_empty() {
                    None
                } else {
                    Some(word.to_lowercase())
                }
            })
            .collect();

        if words.is_empty() {
            return Err(InputError::NoWords {
                path: path.to_string(),
            }
            .into());
        }

        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words in source order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The first `n` words in source order (fewer if the list is shorter)
    pub fn top(&self, n: usize) -> &[String] {
        &self.words[..n.min(self.words.len())]
    }

    /// Words no longer than `max_len` characters, limited to the first
    /// `limit` such words in source order.
    pub fn short_words(&self, max_len: usize, limit: usize) -> Vec<&str> {
        self.words
            .iter()
            .filter(|word| word.chars().count() <= max_len)
            .take(limit)
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_trims_and_lowercases() {
        let source =
            WordSource::from_lines(["  Hello ", "WORLD", "", "   ", "mixedCase"], "test").unwrap();
        assert_eq!(source.words(), &["hello", "world", "mixedcase"]);
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let source = WordSource::from_lines(["b", "a", "b", "c", "a"], "test").unwrap();
        assert_eq!(source.words(), &["b", "a", "b", "c", "a"]);
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn test_top_prefix() {
        let source = WordSource::from_lines(["one", "two", "three"], "test").unwrap();
        assert_eq!(source.top(2), &["one", "two"]);
        assert_eq!(source.top(10).len(), 3);
    }

    #[test]
    fn test_short_words_filter_then_limit() {
        let source =
            WordSource::from_lines(["elephant", "cat", "hippopotamus", "dog", "mouse"], "test")
                .unwrap();
        assert_eq!(source.short_words(5, 10), vec!["cat", "dog", "mouse"]);
        assert_eq!(source.short_words(5, 2), vec!["cat", "dog"]);
    }

    #[test]
    fn test_empty_wordlist_is_an_error() {
        let err = WordSource::from_lines(["", "  "], "empty.txt").unwrap_err();
        assert!(err.to_string().contains("empty.txt"));
    }

    #[test]
    fn test_missing_file() {
        let err = WordSource::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(err.to_string().contains("cannot open"));
    }
}
