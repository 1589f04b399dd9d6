//! Candidate generation strategies
//!
//! Each strategy enumerates a bounded subspace of candidate strings as a
//! lazy iterator, so memory stays O(1) no matter how large the space is.
//! The strategies are listed in a fixed priority order, cheapest and
//! likeliest first; the engine drains them one at a time.

use crate::wordlist::WordSource;

/// Upper bound (exclusive) for the short digit suffixes in the quick-wins
/// pass: `word` + 0..=9999.
const QUICK_DIGIT_BOUND: u64 = 10_000;
/// Upper bound (exclusive) for the pure-number quick-wins pass: 0..=999999.
const QUICK_NUMBER_BOUND: u64 = 1_000_000;
/// Range for the extended 5-6 digit affixes: 10000..=999999.
const EXTENDED_DIGIT_START: u64 = 10_000;
const EXTENDED_DIGIT_BOUND: u64 = 1_000_000;
/// Date candidates cover years [1900, 2025).
const DATE_YEAR_START: u32 = 1900;
const DATE_YEAR_END: u32 = 2025;
/// Sampled long-number passes: 7-8 digits at stride 5, 9-10 at stride 100.
const SAMPLE_7_8_START: u64 = 1_000_000;
const SAMPLE_7_8_END: u64 = 100_000_000;
const SAMPLE_7_8_STRIDE: u64 = 5;
const SAMPLE_9_10_END: u64 = 10_000_000_000;
const SAMPLE_9_10_STRIDE: u64 = 100;
/// Word-pair pass: words of length <= 6, first 500, digits 0..=9999.
const PAIR_WORD_MAX_LEN: usize = 6;
const PAIR_WORD_LIMIT: usize = 500;

/// Tunable bounds shared by the strategy set
#[derive(Debug, Clone)]
pub struct StrategyParams {
    /// Word-prefix bound for the extended digit strategies
    pub top_words: usize,
    /// Zero-padded lengths for the fixed-length number strategy
    pub padded_lengths: Vec<usize>,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            top_words: crate::DEFAULT_TOP_WORDS,
            padded_lengths: vec![4, 6, 8],
        }
    }
}

/// Identifies one enumeration algorithm together with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Every word verbatim, then word + 1-4 digit suffix, then pure numbers
    /// of 1-6 digits
    QuickWins,
    /// Zero-padded numbers at each configured length, lengths ascending
    PaddedNumbers,
    /// `YYYYMMDD` for every year/month/day combination; deliberately no
    /// calendar validation, so e.g. "20240230" is generated
    DatePatterns,
    /// Bounded word prefix with every 5-6 digit suffix
    WordSuffixDigits,
    /// Every 5-6 digit prefix ahead of a bounded word prefix
    DigitPrefixWords,
    /// Concatenations of `count` short words, no separator, lexicographic
    /// product order
    MultiWord { count: usize },
    /// Two short words followed by a 1-4 digit suffix
    WordPairDigits,
    /// 7-10 digit numbers sampled at fixed strides
    SampledNumbers,
}

/// Descriptor for one entry in the priority list
#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub kind: StrategyKind,
}

/// The full strategy set in priority order
pub fn default_strategies() -> Vec<Strategy> {
    vec![
        Strategy {
            name: "quick wins",
            kind: StrategyKind::QuickWins,
        },
        Strategy {
            name: "zero-padded numbers",
            kind: StrategyKind::PaddedNumbers,
        },
        Strategy {
            name: "date patterns",
            kind: StrategyKind::DatePatterns,
        },
        Strategy {
            name: "word + 5-6 digits",
            kind: StrategyKind::WordSuffixDigits,
        },
        Strategy {
            name: "5-6 digits + word",
            kind: StrategyKind::DigitPrefixWords,
        },
        Strategy {
            name: "two words",
            kind: StrategyKind::MultiWord { count: 2 },
        },
        Strategy {
            name: "three words",
            kind: StrategyKind::MultiWord { count: 3 },
        },
        Strategy {
            name: "four words",
            kind: StrategyKind::MultiWord { count: 4 },
        },
        Strategy {
            name: "two words + digits",
            kind: StrategyKind::WordPairDigits,
        },
        Strategy {
            name: "sampled long numbers",
            kind: StrategyKind::SampledNumbers,
        },
    ]
}

/// Short-word subset bounds per composition width, matching the narrower
/// subsets used for the wider products.
fn multi_word_bounds(count: usize) -> (usize, usize) {
    if count >= 4 {
        (4, 200)
    } else {
        (6, 600)
    }
}

impl Strategy {
    /// Build a fresh lazy iterator over this strategy's candidates.
    ///
    /// Sequences are finite, non-restartable, and produced on demand; no
    /// candidate list is ever materialized.
    pub fn candidates<'a>(
        &self,
        words: &'a WordSource,
        params: &StrategyParams,
    ) -> Box<dyn Iterator<Item = String> + Send + 'a> {
        match self.kind {
            StrategyKind::QuickWins => Box::new(
                words
                    .words()
                    .iter()
                    .cloned()
                    .chain(WordDigits::new(words.words(), 0, QUICK_DIGIT_BOUND))
                    .chain(NumberRange::plain(0, QUICK_NUMBER_BOUND)),
            ),
            StrategyKind::PaddedNumbers => {
                let mut lengths = params.padded_lengths.clone();
                lengths.sort_unstable();
                lengths.dedup();
                Box::new(lengths.into_iter().flat_map(NumberRange::padded))
            }
            StrategyKind::DatePatterns => Box::new(DateCandidates::new()),
            StrategyKind::WordSuffixDigits => Box::new(WordDigits::new(
                words.top(params.top_words),
                EXTENDED_DIGIT_START,
                EXTENDED_DIGIT_BOUND,
            )),
            StrategyKind::DigitPrefixWords => Box::new(DigitWords::new(
                words.top(params.top_words),
                EXTENDED_DIGIT_START,
                EXTENDED_DIGIT_BOUND,
            )),
            StrategyKind::MultiWord { count } => {
                let (max_len, limit) = multi_word_bounds(count);
                Box::new(MultiWords::new(words.short_words(max_len, limit), count))
            }
            StrategyKind::WordPairDigits => Box::new(PairDigits::new(
                words.short_words(PAIR_WORD_MAX_LEN, PAIR_WORD_LIMIT),
            )),
            StrategyKind::SampledNumbers => Box::new(
                NumberRange::strided(SAMPLE_7_8_START, SAMPLE_7_8_END, SAMPLE_7_8_STRIDE).chain(
                    NumberRange::strided(SAMPLE_7_8_END, SAMPLE_9_10_END, SAMPLE_9_10_STRIDE),
                ),
            ),
        }
    }

    /// Exact size of this strategy's candidate space, used for progress and
    /// ETA reporting only.
    pub fn estimated_candidates(&self, words: &WordSource, params: &StrategyParams) -> u64 {
        match self.kind {
            StrategyKind::QuickWins => {
                let count = words.len() as u64;
                count + count * QUICK_DIGIT_BOUND + QUICK_NUMBER_BOUND
            }
            StrategyKind::PaddedNumbers => {
                let mut lengths = params.padded_lengths.clone();
                lengths.sort_unstable();
                lengths.dedup();
                lengths.iter().map(|&len| 10u64.pow(len as u32)).sum()
            }
            StrategyKind::DatePatterns => {
                u64::from(DATE_YEAR_END - DATE_YEAR_START) * 12 * 31
            }
            StrategyKind::WordSuffixDigits | StrategyKind::DigitPrefixWords => {
                words.top(params.top_words).len() as u64
                    * (EXTENDED_DIGIT_BOUND - EXTENDED_DIGIT_START)
            }
            StrategyKind::MultiWord { count } => {
                let (max_len, limit) = multi_word_bounds(count);
                (words.short_words(max_len, limit).len() as u64).pow(count as u32)
            }
            StrategyKind::WordPairDigits => {
                let subset = words.short_words(PAIR_WORD_MAX_LEN, PAIR_WORD_LIMIT).len() as u64;
                subset * subset * QUICK_DIGIT_BOUND
            }
            StrategyKind::SampledNumbers => {
                (SAMPLE_7_8_END - SAMPLE_7_8_START).div_ceil(SAMPLE_7_8_STRIDE)
                    + (SAMPLE_9_10_END - SAMPLE_7_8_END).div_ceil(SAMPLE_9_10_STRIDE)
            }
        }
    }
}

/// Ascending decimal numbers in `[start, end)`, with an optional stride and
/// an optional zero-padded width.
struct NumberRange {
    cursor: u64,
    end: u64,
    stride: u64,
    width: usize,
}

impl NumberRange {
    fn plain(start: u64, end: u64) -> Self {
        Self {
            cursor: start,
            end,
            stride: 1,
            width: 0,
        }
    }

    fn padded(width: usize) -> Self {
        Self {
            cursor: 0,
            end: 10u64.pow(width as u32),
            stride: 1,
            width,
        }
    }

    fn strided(start: u64, end: u64, stride: u64) -> Self {
        Self {
            cursor: start,
            end,
            stride,
            width: 0,
        }
    }
}

impl Iterator for NumberRange {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.cursor >= self.end {
            return None;
        }
        let value = self.cursor;
        self.cursor += self.stride;
        Some(if self.width == 0 {
            value.to_string()
        } else {
            format!("{:0width$}", value, width = self.width)
        })
    }
}

/// `word` + digit, words in source order (outer), digits ascending (inner)
struct WordDigits<'a> {
    words: &'a [String],
    start: u64,
    end: u64,
    word: usize,
    digit: u64,
}

impl<'a> WordDigits<'a> {
    fn new(words: &'a [String], start: u64, end: u64) -> Self {
        Self {
            words,
            start,
            end,
            word: 0,
            digit: start,
        }
    }
}

impl Iterator for WordDigits<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.word >= self.words.len() || self.start >= self.end {
            return None;
        }
        let candidate = format!("{}{}", self.words[self.word], self.digit);
        self.digit += 1;
        if self.digit >= self.end {
            self.digit = self.start;
            self.word += 1;
        }
        Some(candidate)
    }
}

/// digit + `word`, same ordering as [`WordDigits`]
struct DigitWords<'a> {
    words: &'a [String],
    start: u64,
    end: u64,
    word: usize,
    digit: u64,
}

impl<'a> DigitWords<'a> {
    fn new(words: &'a [String], start: u64, end: u64) -> Self {
        Self {
            words,
            start,
            end,
            word: 0,
            digit: start,
        }
    }
}

impl Iterator for DigitWords<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.word >= self.words.len() || self.start >= self.end {
            return None;
        }
        let candidate = format!("{}{}", self.digit, self.words[self.word]);
        self.digit += 1;
        if self.digit >= self.end {
            self.digit = self.start;
            self.word += 1;
        }
        Some(candidate)
    }
}

/// `YYYYMMDD` candidates; every day value 1..=31 is emitted for every month,
/// calendar-impossible dates included.
struct DateCandidates {
    year: u32,
    month: u32,
    day: u32,
}

impl DateCandidates {
    fn new() -> Self {
        Self {
            year: DATE_YEAR_START,
            month: 1,
            day: 1,
        }
    }
}

impl Iterator for DateCandidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.year >= DATE_YEAR_END {
            return None;
        }
        let candidate = format!("{:04}{:02}{:02}", self.year, self.month, self.day);
        self.day += 1;
        if self.day > 31 {
            self.day = 1;
            self.month += 1;
            if self.month > 12 {
                self.month = 1;
                self.year += 1;
            }
        }
        Some(candidate)
    }
}

/// Cartesian product of a word subset with itself `count` times, concatenated
/// with no separator. The index vector advances like an odometer with the
/// rightmost position fastest, which yields lexicographic product order.
struct MultiWords<'a> {
    words: Vec<&'a str>,
    indices: Vec<usize>,
    done: bool,
}

impl<'a> MultiWords<'a> {
    fn new(words: Vec<&'a str>, count: usize) -> Self {
        let done = words.is_empty() || count == 0;
        Self {
            words,
            indices: vec![0; count],
            done,
        }
    }
}

impl Iterator for MultiWords<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let candidate: String = self.indices.iter().map(|&i| self.words[i]).collect();
        let mut position = self.indices.len();
        loop {
            if position == 0 {
                self.done = true;
                break;
            }
            position -= 1;
            self.indices[position] += 1;
            if self.indices[position] < self.words.len() {
                break;
            }
            self.indices[position] = 0;
        }
        Some(candidate)
    }
}

/// Word pairs in lexicographic product order, each pair expanded with every
/// 1-4 digit suffix before the pair advances.
struct PairDigits<'a> {
    words: Vec<&'a str>,
    first: usize,
    second: usize,
    digit: u64,
}

impl<'a> PairDigits<'a> {
    fn new(words: Vec<&'a str>) -> Self {
        Self {
            words,
            first: 0,
            second: 0,
            digit: 0,
        }
    }
}

impl Iterator for PairDigits<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.first >= self.words.len() {
            return None;
        }
        let candidate = format!(
            "{}{}{}",
            self.words[self.first], self.words[self.second], self.digit
        );
        self.digit += 1;
        if self.digit >= QUICK_DIGIT_BOUND {
            self.digit = 0;
            self.second += 1;
            if self.second >= self.words.len() {
                self.second = 0;
                self.first += 1;
            }
        }
        Some(candidate)
    }
}
