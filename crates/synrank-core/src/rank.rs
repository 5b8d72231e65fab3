//! Frequency ranking of synonyms.
//!
//! [`Ranker`] ties a [`SynsetSource`] to a [`FrequencySource`] and offers the
//! two views of a word's synonyms:
//!
//! - [`Ranker::most_frequent`]: ratios against the most frequent synonym,
//!   optionally cut at a [`DominationRate`].
//! - [`Ranker::more_frequent`]: only synonyms used more often than the word
//!   itself, with ratios against the word.
//!
//! Both return the full candidate list alongside, sorted lexicographically.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::Serialize;

use crate::frequency::FrequencySource;
use crate::lexicon::{self, Strategy, SynsetSource};

/// Decimal places kept for [`Ranker::most_frequent`] ratios.
pub const MOST_FREQUENT_PLACES: usize = 5;

/// Decimal places kept for [`Ranker::more_frequent`] ratios.
pub const MORE_FREQUENT_PLACES: usize = 2;

/// Minimum share of the top synonym's frequency a synonym needs to be kept.
///
/// Always in `(0, 1]`. A rate of `0.25` drops synonyms more than four times
/// rarer than the top one; `1.0` keeps only the top one (and its ties).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct DominationRate(f64);

impl DominationRate {
    /// Validate a rate. Anything outside `(0, 1]`, NaN included, is `None`.
    pub fn new(rate: f64) -> Option<Self> {
        (rate > 0.0 && rate <= 1.0).then_some(Self(rate))
    }

    /// The rate as a fraction.
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// A synonym with its frequency relative to a baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSynonym {
    /// The synonym.
    pub word: String,
    /// Frequency divided by the baseline, rounded.
    pub ratio: f64,
}

/// Result of a ranking call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    /// Synonyms that passed the filter, most frequent first.
    pub ranked: Vec<RankedSynonym>,
    /// Every candidate, sorted lexicographically, regardless of filtering.
    pub complete: Vec<String>,
}

impl Ranking {
    fn unranked(complete: Vec<String>) -> Self {
        Self {
            ranked: Vec::new(),
            complete,
        }
    }
}

/// Round half to even at `places` decimals.
pub fn round_to(value: f64, places: usize) -> f64 {
    let scale = 10_f64.powi(places as i32);
    (value * scale).round_ties_even() / scale
}

/// Highest frequency first; equal frequencies in lexicographic order.
fn by_frequency_desc(a: &(String, f64), b: &(String, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Ranks synonyms of a word by usage frequency.
#[derive(Debug, Clone)]
pub struct Ranker<L, F> {
    lexicon: L,
    frequencies: F,
    parallel: bool,
}

impl<L, F> Ranker<L, F>
where
    L: SynsetSource,
    F: FrequencySource + Sync,
{
    /// Create a ranker that fetches frequencies one word at a time.
    pub const fn new(lexicon: L, frequencies: F) -> Self {
        Self {
            lexicon,
            frequencies,
            parallel: false,
        }
    }

    /// Fetch candidate frequencies concurrently on the rayon pool.
    ///
    /// Results are identical to sequential fetching.
    #[must_use]
    pub const fn with_parallel_fetch(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The lexical source.
    pub const fn lexicon(&self) -> &L {
        &self.lexicon
    }

    /// Synonym candidates of `word` under `strategy`.
    pub fn synonyms(&self, word: &str, strategy: Strategy) -> BTreeSet<String> {
        lexicon::synonyms(&self.lexicon, word, strategy)
    }

    /// Usage frequency of a single word (normalized first).
    pub fn frequency(&self, word: &str) -> f64 {
        self.frequencies.frequency(&lexicon::normalize(word))
    }

    fn measure(&self, words: &[String]) -> Vec<(String, f64)> {
        let frequencies = &self.frequencies;
        let fetch = |word: &String| (word.clone(), frequencies.frequency(word));
        if self.parallel {
            words.par_iter().map(fetch).collect()
        } else {
            words.iter().map(fetch).collect()
        }
    }

    /// Synonyms ranked against the most frequent one.
    ///
    /// Every ratio is at most `1.0`. Without a valid `domination_rate` (absent
    /// or outside `(0, 1]`) all synonyms with any frequency data are kept;
    /// with one, only those at or above `rate * top frequency`. When no
    /// candidate has frequency data the ranked list is empty.
    #[tracing::instrument(skip(self))]
    pub fn most_frequent(&self, word: &str, domination_rate: Option<f64>) -> Ranking {
        let word = lexicon::normalize(word);
        let complete: Vec<String> = self.synonyms(&word, Strategy::Narrow).into_iter().collect();
        if complete.is_empty() {
            return Ranking::default();
        }

        let rate = domination_rate.and_then(DominationRate::new);
        if domination_rate.is_some() && rate.is_none() {
            tracing::debug!("domination rate outside (0, 1], not filtering");
        }

        let mut measured = self.measure(&complete);
        measured.sort_by(by_frequency_desc);
        let base = measured[0].1;
        if base <= 0.0 {
            tracing::info!(candidates = complete.len(), "no frequency data for any synonym");
            return Ranking::unranked(complete);
        }

        let keep = |frequency: f64| match rate {
            Some(rate) => frequency >= rate.get() * base,
            None => frequency > 0.0,
        };
        let ranked = measured
            .into_iter()
            .filter(|(_, frequency)| keep(*frequency))
            .map(|(word, frequency)| RankedSynonym {
                word,
                ratio: round_to(frequency / base, MOST_FREQUENT_PLACES),
            })
            .collect::<Vec<_>>();
        tracing::debug!(base, kept = ranked.len(), "ranked synonyms");
        Ranking { ranked, complete }
    }

    /// Synonyms used strictly more often than `word` itself.
    ///
    /// Ratios are against the word's own frequency, so all exceed `1.0`. When
    /// the word has no frequency data the ranked list is empty.
    #[tracing::instrument(skip(self))]
    pub fn more_frequent(&self, word: &str) -> Ranking {
        let word = lexicon::normalize(word);
        let complete: Vec<String> = self.synonyms(&word, Strategy::Narrow).into_iter().collect();
        if complete.is_empty() {
            return Ranking::default();
        }

        let mut words = Vec::with_capacity(complete.len() + 1);
        words.push(word);
        words.extend(complete.iter().cloned());
        let mut measured = self.measure(&words);
        let base = measured[0].1;
        if base <= 0.0 {
            tracing::info!("no frequency data for the word itself");
            return Ranking::unranked(complete);
        }

        measured.sort_by(by_frequency_desc);
        let ranked = measured
            .into_iter()
            .filter(|(_, frequency)| *frequency > base)
            .map(|(word, frequency)| RankedSynonym {
                word,
                ratio: round_to(frequency / base, MORE_FREQUENT_PLACES),
            })
            .collect::<Vec<_>>();
        tracing::debug!(base, kept = ranked.len(), "ranked synonyms");
        Ranking { ranked, complete }
    }
}
