//! Synonym candidates from a lexical database.
//!
//! A [`SynsetSource`] answers "which synsets contain this word"; [`synonyms`]
//! turns that answer into a set of single-word candidates using one of two
//! [`Strategy`] values. [`WordNet`] reads a WordNet database directory and
//! [`MemorySynsets`] holds a small table in memory.

mod wordnet;

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

pub use wordnet::{Database, WordNet};

/// Words shorter than this (in characters) are never looked up.
pub const MIN_WORD_LEN: usize = 3;

/// Lower-case and trim a word.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Whether a word is long enough to be looked up.
pub fn is_eligible(word: &str) -> bool {
    word.chars().count() >= MIN_WORD_LEN
}

/// Whether a term is a multi-word phrase (`ice_cream`, `ice cream`).
pub fn is_composite(term: &str) -> bool {
    term.contains(['_', ' '])
}

/// Part of speech of a synset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    /// Nouns.
    Noun,
    /// Verbs.
    Verb,
    /// Adjectives, including satellite adjectives.
    Adjective,
    /// Adverbs.
    Adverb,
}

impl PartOfSpeech {
    /// Lookup order used when a word has synsets in several parts of speech.
    pub const ALL: [Self; 4] = [Self::Noun, Self::Verb, Self::Adjective, Self::Adverb];

    /// File suffix used by the WordNet database (`index.noun`, `data.adj`, ...).
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adj",
            Self::Adverb => "adv",
        }
    }

    /// Parse the single-letter code from a database line.
    ///
    /// `s` (satellite adjective) maps to [`PartOfSpeech::Adjective`].
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'n' => Some(Self::Noun),
            'v' => Some(Self::Verb),
            'a' | 's' => Some(Self::Adjective),
            'r' => Some(Self::Adverb),
            _ => None,
        }
    }
}

/// A group of interchangeable words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synset {
    /// Part of speech the synset belongs to.
    pub pos: PartOfSpeech,
    /// Member word forms, as stored (may contain underscores or capitals).
    pub lemmas: Vec<String>,
}

/// Candidate extraction strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Strategy {
    /// Members of the first synset only. Used for frequency ranking.
    #[default]
    Narrow,
    /// Members of every synset containing the word.
    Lemmas,
}

impl Strategy {
    /// Returns the strategy name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Narrow => "narrow",
            Self::Lemmas => "lemmas",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can list the synsets of a word.
///
/// Implementations receive an already normalized word and return synsets in
/// a stable order: by [`PartOfSpeech::ALL`], then by database order.
pub trait SynsetSource {
    /// All synsets containing `word`.
    fn synsets(&self, word: &str) -> Vec<Synset>;
}

impl<T: SynsetSource + ?Sized> SynsetSource for &T {
    fn synsets(&self, word: &str) -> Vec<Synset> {
        (**self).synsets(word)
    }
}

/// Collect single-word synonyms of `word`.
///
/// The word is normalized first. Words shorter than [`MIN_WORD_LEN`] and
/// words unknown to the source give an empty set. The result never contains
/// the word itself or a composite term.
#[tracing::instrument(skip(source, strategy), fields(strategy = %strategy))]
pub fn synonyms<S>(source: &S, word: &str, strategy: Strategy) -> BTreeSet<String>
where
    S: SynsetSource + ?Sized,
{
    let word = normalize(word);
    if !is_eligible(&word) {
        tracing::debug!("word too short for lookup");
        return BTreeSet::new();
    }

    let synsets = source.synsets(&word);
    let selected = match strategy {
        Strategy::Narrow => &synsets[..synsets.len().min(1)],
        Strategy::Lemmas => &synsets[..],
    };

    let found: BTreeSet<String> = selected
        .iter()
        .flat_map(|synset| synset.lemmas.iter())
        .map(|lemma| lemma.to_lowercase())
        .filter(|lemma| !is_composite(lemma) && *lemma != word)
        .collect();
    tracing::debug!(synsets = synsets.len(), found = found.len(), "collected synonyms");
    found
}

/// An in-memory synset table.
///
/// Each synset added is indexed under every one of its members, the way a
/// WordNet index file lists a synset under each lemma.
#[derive(Debug, Clone, Default)]
pub struct MemorySynsets {
    by_word: HashMap<String, Vec<Synset>>,
}

impl MemorySynsets {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a synset and index it under each member.
    pub fn with_synset<I, S>(mut self, pos: PartOfSpeech, lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let synset = Synset {
            pos,
            lemmas: lemmas.into_iter().map(Into::into).collect(),
        };
        for lemma in &synset.lemmas {
            self.by_word
                .entry(lemma.to_lowercase())
                .or_default()
                .push(synset.clone());
        }
        self
    }
}

impl SynsetSource for MemorySynsets {
    fn synsets(&self, word: &str) -> Vec<Synset> {
        let mut found = self.by_word.get(word).cloned().unwrap_or_default();
        // Stable sort keeps insertion order inside each part of speech.
        found.sort_by_key(|synset| {
            PartOfSpeech::ALL
                .iter()
                .position(|pos| *pos == synset.pos)
                .unwrap_or(usize::MAX)
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MemorySynsets {
        MemorySynsets::new()
            .with_synset(PartOfSpeech::Noun, ["test", "trial", "tryout"])
            .with_synset(PartOfSpeech::Noun, ["trial", "trial_run", "test", "tryout"])
            .with_synset(
                PartOfSpeech::Verb,
                ["test", "prove", "try", "try_out", "examine", "essay"],
            )
            .with_synset(PartOfSpeech::Noun, ["test", "mental_test", "exam", "Quiz"])
    }

    #[test]
    fn narrow_uses_first_synset_only() {
        let found = synonyms(&table(), "tryout", Strategy::Narrow);
        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            vec!["test", "trial"]
        );
    }

    #[test]
    fn lemmas_collects_every_synset() {
        let found = synonyms(&table(), "test", Strategy::Lemmas);
        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            vec!["essay", "exam", "examine", "prove", "quiz", "trial", "try", "tryout"]
        );
    }

    #[test]
    fn nouns_come_before_verbs_for_narrow() {
        let source = MemorySynsets::new()
            .with_synset(PartOfSpeech::Verb, ["run", "operate"])
            .with_synset(PartOfSpeech::Noun, ["run", "tally"]);
        let found = synonyms(&source, "run", Strategy::Narrow);
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["tally"]);
    }

    #[test]
    fn input_is_normalized() {
        let found = synonyms(&table(), "  TryOut \n", Strategy::Narrow);
        assert!(found.contains("test"));
        assert!(!found.contains("tryout"));
    }

    #[test]
    fn short_words_yield_nothing() {
        let source = MemorySynsets::new().with_synset(PartOfSpeech::Noun, ["ox", "bullock"]);
        assert!(synonyms(&source, "ox", Strategy::Lemmas).is_empty());
        assert!(synonyms(&source, " ox ", Strategy::Narrow).is_empty());
    }

    #[test]
    fn unknown_word_yields_nothing() {
        assert!(synonyms(&table(), "zzyzx", Strategy::Lemmas).is_empty());
    }

    #[test]
    fn composite_terms_are_dropped() {
        let found = synonyms(&table(), "trial", Strategy::Lemmas);
        assert!(found.iter().all(|term| !is_composite(term)));
        assert!(!found.contains("trial_run"));
    }

    #[test]
    fn composite_detection() {
        assert!(is_composite("ice_cream"));
        assert!(is_composite("ice cream"));
        assert!(!is_composite("icecream"));
    }

    #[test]
    fn eligibility_counts_characters() {
        assert!(!is_eligible("ab"));
        assert!(is_eligible("abc"));
        assert!(!is_eligible("é"));
        assert!(is_eligible("été"));
    }

    #[test]
    fn satellite_code_maps_to_adjective() {
        assert_eq!(PartOfSpeech::from_code('s'), Some(PartOfSpeech::Adjective));
        assert_eq!(PartOfSpeech::from_code('x'), None);
    }
}
