//! Keyword density and n-gram frequency analysis.
//!
//! Given a text, an optional target phrase, and an n-gram size, the analyzer
//! reports:
//!
//! - total words (after normalization, see [`text::tokenize`])
//! - how often the target phrase occurs as an exact token sequence, and its
//!   density as a percentage of total words
//! - whether the phrase shows up early (within the first 100 words)
//! - the most frequent n-grams after stop-word filtering
//!
//! Analysis is pure: the same input always produces the same report, and no
//! input string makes it fail. The only fallible step is turning a raw
//! integer into an [`NGramSize`].
//!
//! ```
//! use seo_lens_core::density::{self, NGramSize, Prominence};
//!
//! let report = density::analyze(
//!     "SEO is great. SEO helps you rank. I love SEO strategy.",
//!     Some("seo"),
//!     NGramSize::One,
//! );
//! assert_eq!(report.total_words, 11);
//! assert_eq!(report.target_count, 3);
//! assert_eq!(report.target_density_percent, 27.27);
//! assert_eq!(report.prominence, Prominence::FoundEarly);
//! ```

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::stopwords::{EdgeStopWordFilter, PhraseFilter, StopWords};
use crate::text;

/// Number of tokens per phrase when ranking frequent phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum NGramSize {
    /// Single words.
    #[default]
    #[cfg_attr(feature = "clap", value(name = "1"))]
    One,
    /// Two-word phrases.
    #[cfg_attr(feature = "clap", value(name = "2"))]
    Two,
    /// Three-word phrases.
    #[cfg_attr(feature = "clap", value(name = "3"))]
    Three,
}

impl NGramSize {
    /// Window length in tokens.
    pub const fn get(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for NGramSize {
    type Error = AnalysisError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(AnalysisError::InvalidNGramSize(other)),
        }
    }
}

impl From<NGramSize> for u8 {
    fn from(size: NGramSize) -> Self {
        // Always 1..=3.
        size.get() as Self
    }
}

impl std::fmt::Display for NGramSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Validated input for a density analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Raw text to analyze.
    pub text: String,
    /// Optional phrase to measure, case-insensitive, may span several words.
    pub target_phrase: Option<String>,
    /// Phrase length for the frequency table.
    pub ngram_size: NGramSize,
}

impl AnalysisInput {
    /// Build an input, rejecting n-gram sizes other than 1, 2, or 3.
    ///
    /// A blank target phrase is treated as no target.
    pub fn new(
        text: impl Into<String>,
        target_phrase: Option<&str>,
        ngram_size: u8,
    ) -> AnalysisResult<Self> {
        let ngram_size = NGramSize::try_from(ngram_size)?;
        let target_phrase = target_phrase
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned);
        Ok(Self {
            text: text.into(),
            target_phrase,
            ngram_size,
        })
    }
}

/// Where the target phrase first appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Prominence {
    /// Occurs within the prominence window (first 100 words by default).
    FoundEarly,
    /// Occurs, but only after the prominence window.
    FoundLate,
    /// Does not occur, or no target phrase was given.
    NotFound,
}

impl Prominence {
    /// Human-readable summary used by text output.
    pub const fn message(self) -> &'static str {
        match self {
            Self::FoundEarly => "found early in the text",
            Self::FoundLate => "found, but only later in the text",
            Self::NotFound => "not found",
        }
    }
}

/// A ranked phrase and how often it occurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PhraseFrequency {
    /// Space-joined normalized tokens.
    pub phrase: String,
    /// Number of occurrences.
    pub count: usize,
    /// `count / total_words * 100`, two decimals.
    pub density_percent: f64,
}

/// Result of a density analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DensityReport {
    /// Tokens after normalization.
    pub total_words: usize,
    /// Characters in the raw text, including whitespace.
    pub total_characters: usize,
    /// Characters in the raw text, excluding whitespace.
    pub characters_no_spaces: usize,
    /// The normalized target phrase, if one was given and survived normalization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_phrase: Option<String>,
    /// Exact token-sequence matches of the target phrase.
    pub target_count: usize,
    /// `target_count / total_words * 100`, two decimals; 0 for empty text.
    pub target_density_percent: f64,
    /// Early/late/absent classification of the target phrase.
    pub prominence: Prominence,
    /// Most frequent phrases, highest count first.
    pub top_phrases: Vec<PhraseFrequency>,
    /// Density ceiling the caller asked to enforce.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_density_percent: Option<f64>,
    /// Whether `target_density_percent` exceeds `max_density_percent`.
    pub over_max: bool,
}

impl DensityReport {
    /// Attach a density ceiling and compute `over_max`.
    #[must_use]
    pub fn with_max_density(mut self, max: Option<f64>) -> Self {
        self.max_density_percent = max;
        self.over_max = max.is_some_and(|m| self.target_density_percent > m);
        self
    }
}

/// Largest number of ranked phrases a report may carry.
pub const MAX_PHRASES: usize = 20;

/// Smallest occurrence count a ranked phrase may have.
pub const MIN_PHRASE_COUNT: usize = 2;

/// Tunable limits for an analysis.
///
/// `max_phrases` is capped at [`MAX_PHRASES`] and `min_count` floored at
/// [`MIN_PHRASE_COUNT`] when the policy is installed on an analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DensityPolicy {
    /// Number of leading words that count as "early".
    pub prominence_window: usize,
    /// Maximum number of phrases to report.
    pub max_phrases: usize,
    /// Phrases occurring fewer times than this are dropped.
    pub min_count: usize,
}

impl Default for DensityPolicy {
    fn default() -> Self {
        Self {
            prominence_window: 100,
            max_phrases: MAX_PHRASES,
            min_count: MIN_PHRASE_COUNT,
        }
    }
}

impl DensityPolicy {
    /// This policy with the ranking limits pulled back into range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            prominence_window: self.prominence_window,
            max_phrases: self.max_phrases.min(MAX_PHRASES),
            min_count: self.min_count.max(MIN_PHRASE_COUNT),
        }
    }
}

/// A density analyzer with an explicit stop-word set and phrase filter.
///
/// Holds no per-call state; one instance can serve any number of analyses,
/// from any number of threads.
#[derive(Debug)]
pub struct KeywordAnalyzer {
    policy: DensityPolicy,
    stop_words: StopWords,
    filter: Box<dyn PhraseFilter>,
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordAnalyzer {
    /// Analyzer with the default policy, English stop words, and edge filter.
    pub fn new() -> Self {
        Self {
            policy: DensityPolicy::default(),
            stop_words: StopWords::english(),
            filter: Box::new(EdgeStopWordFilter),
        }
    }

    /// Replace the limits, clamping the ranking limits into range.
    #[must_use]
    pub fn with_policy(mut self, policy: DensityPolicy) -> Self {
        let clamped = policy.clamped();
        if clamped != policy {
            tracing::warn!(
                requested_max_phrases = policy.max_phrases,
                requested_min_count = policy.min_count,
                max_phrases = clamped.max_phrases,
                min_count = clamped.min_count,
                "density limits out of range, clamped"
            );
        }
        self.policy = clamped;
        self
    }

    /// Replace the stop-word set.
    #[must_use]
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Replace the phrase filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl PhraseFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// The active limits.
    pub const fn policy(&self) -> &DensityPolicy {
        &self.policy
    }

    /// Analyze a validated input.
    pub fn analyze_input(&self, input: &AnalysisInput) -> DensityReport {
        self.analyze(&input.text, input.target_phrase.as_deref(), input.ngram_size)
    }

    /// Analyze `text`, measuring `target_phrase` and ranking `ngram_size` phrases.
    #[tracing::instrument(skip(self, text), fields(text_len = text.len(), ngram = %ngram_size))]
    pub fn analyze(
        &self,
        text: &str,
        target_phrase: Option<&str>,
        ngram_size: NGramSize,
    ) -> DensityReport {
        let tokens = text::tokenize(text);
        let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let total_words = words.len();

        let target_tokens = target_phrase.map(text::tokenize).unwrap_or_default();
        let target: Vec<&str> = target_tokens.iter().map(String::as_str).collect();

        let positions = match_positions(&words, &target);
        let target_count = positions.len();
        let prominence = self.classify(&words, &target, target_count);
        let top_phrases = self.rank_phrases(&words, ngram_size);

        tracing::debug!(
            total_words,
            target_count,
            phrases = top_phrases.len(),
            "density analysis complete"
        );

        DensityReport {
            total_words,
            total_characters: text.chars().count(),
            characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
            target_phrase: (!target.is_empty()).then(|| target.join(" ")),
            target_count,
            target_density_percent: percent(target_count, total_words),
            prominence,
            top_phrases,
            max_density_percent: None,
            over_max: false,
        }
    }

    /// Early when the joined leading window contains the phrase as a substring.
    ///
    /// Only consulted once the phrase has at least one exact match, so
    /// `NotFound` always means a zero count.
    fn classify(&self, words: &[&str], target: &[&str], target_count: usize) -> Prominence {
        if target_count == 0 {
            return Prominence::NotFound;
        }
        let head = &words[..words.len().min(self.policy.prominence_window)];
        if head.join(" ").contains(&target.join(" ")) {
            Prominence::FoundEarly
        } else {
            Prominence::FoundLate
        }
    }

    fn rank_phrases(&self, words: &[&str], ngram_size: NGramSize) -> Vec<PhraseFrequency> {
        let n = ngram_size.get();
        let total_words = words.len();

        // Entries stay in first-seen order; `index` maps phrase -> entry.
        let mut entries: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for window in words.windows(n) {
            if !self.filter.keep(window, &self.stop_words) {
                continue;
            }
            let phrase = window.join(" ");
            if let Some(&slot) = index.get(&phrase) {
                entries[slot].1 += 1;
            } else {
                index.insert(phrase.clone(), entries.len());
                entries.push((phrase, 1));
            }
        }

        let min_count = self.policy.min_count;
        entries.retain(|(_, count)| *count >= min_count);
        // Stable sort keeps first-seen order among equal counts.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(self.policy.max_phrases);

        entries
            .into_iter()
            .map(|(phrase, count)| PhraseFrequency {
                phrase,
                count,
                density_percent: percent(count, total_words),
            })
            .collect()
    }
}

/// Analyze with the default analyzer.
pub fn analyze(text: &str, target_phrase: Option<&str>, ngram_size: NGramSize) -> DensityReport {
    KeywordAnalyzer::new().analyze(text, target_phrase, ngram_size)
}

/// Start indices of every exact occurrence of `needle` in `haystack`.
///
/// Overlapping matches all count ("buy buy buy" contains "buy buy" twice).
pub(crate) fn match_positions(haystack: &[&str], needle: &[&str]) -> Vec<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return Vec::new();
    }
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(i, _)| i)
        .collect()
}

/// `part / whole * 100` rounded to two decimals; 0 when `whole` is 0.
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
