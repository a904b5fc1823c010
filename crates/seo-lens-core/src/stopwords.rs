//! Stop words and the phrase boundary policy.
//!
//! Which phrases count as "keywords" is a product decision, not something
//! derived from the text. The default list and the edge rule below are the
//! shipped behavior; both can be swapped through [`StopWords`] and
//! [`PhraseFilter`].

use std::collections::HashSet;

/// Default English stop words: articles, auxiliaries, prepositions,
/// conjunctions, pronouns, and demonstratives.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "so", "as", "than", "then", "is", "are", "was",
    "were", "be", "been", "being", "am", "have", "has", "had", "do", "does", "did", "will",
    "would", "should", "could", "can", "may", "might", "must", "in", "on", "at", "to", "for", "of",
    "with", "by", "from", "about", "into", "i", "you", "he", "she", "it", "we", "they", "me",
    "my", "your", "our", "its", "their", "this", "that", "these", "those",
];

/// A case-insensitive stop-word set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

impl StopWords {
    /// The default English list ([`DEFAULT_STOP_WORDS`]).
    pub fn english() -> Self {
        Self::from_words(DEFAULT_STOP_WORDS.iter().copied())
    }

    /// A set that filters nothing.
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Build a set from arbitrary words; entries are lowercased and trimmed.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Add more words to the set.
    #[must_use]
    pub fn with_extra<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    /// Whether `word` is a stop word. Tokens are expected to be lowercase
    /// already, so this does not allocate.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of words in the set.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Decides whether an n-gram window is worth counting as a phrase.
pub trait PhraseFilter: Send + Sync + std::fmt::Debug {
    /// Return `true` to count `window` (already normalized tokens).
    fn keep(&self, window: &[&str], stop_words: &StopWords) -> bool;
}

/// Default rule: single words must not be stop words and must be at least two
/// characters long; longer phrases must not start or end with a stop word.
///
/// Interior stop words are allowed, so "search for pizza" is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeStopWordFilter;

impl PhraseFilter for EdgeStopWordFilter {
    fn keep(&self, window: &[&str], stop_words: &StopWords) -> bool {
        match window {
            [] => false,
            [word] => word.chars().count() >= 2 && !stop_words.contains(word),
            [first, .., last] => !stop_words.contains(first) && !stop_words.contains(last),
        }
    }
}
