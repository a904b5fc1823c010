//! Word and character counting with readability heuristics.
//!
//! Readability uses the two Flesch formulas:
//!
//! - Reading ease: `206.835 - 1.015 * (words/sentences) - 84.6 * (syllables/words)`
//!   (higher is easier, 60–70 is plain English)
//! - Grade level: `0.39 * (words/sentences) + 11.8 * (syllables/words) - 15.59`
//!
//! Reading and speaking time assume 238 and 150 words per minute.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dictionaries::syllables;
use crate::markdown;
use crate::text;

/// Average silent reading speed, words per minute.
pub const READING_WPM: f64 = 238.0;

/// Average speaking speed, words per minute.
pub const SPEAKING_WPM: f64 = 150.0;

/// Flesch scores for a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Readability {
    /// Flesch reading ease (roughly 0–100, higher is easier).
    pub reading_ease: f64,
    /// Band name for `reading_ease`, e.g. "fairly easy".
    pub ease_label: String,
    /// Flesch-Kincaid grade level.
    pub grade: f64,
    /// Total syllables.
    pub syllables: usize,
}

/// Counts and readability for a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextStats {
    /// Words containing at least one letter or digit.
    pub words: usize,
    /// All characters, whitespace included.
    pub characters: usize,
    /// Characters excluding whitespace.
    pub characters_no_spaces: usize,
    /// Sentences detected.
    pub sentences: usize,
    /// Blank-line separated paragraphs.
    pub paragraphs: usize,
    /// Mean letters and digits per word, two decimals.
    pub avg_word_length: f64,
    /// Mean words per sentence, two decimals.
    pub avg_sentence_length: f64,
    /// Estimated silent reading time, whole seconds rounded up.
    pub reading_time_seconds: u64,
    /// Estimated time to read aloud, whole seconds rounded up.
    pub speaking_time_seconds: u64,
    /// Flesch scores; absent when there are no words or sentences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability: Option<Readability>,
    /// Maximum acceptable grade (if provided).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_grade: Option<f64>,
    /// Whether the grade exceeds the maximum.
    pub over_max: bool,
}

/// Count words, characters, sentences and paragraphs, and score readability.
///
/// Never fails: empty input produces an all-zero report without readability.
///
/// # Arguments
///
/// * `text` - The text to count.
/// * `strip_md` - If `true`, reduce markdown to plain text first.
/// * `max_grade` - Optional maximum acceptable grade level.
#[tracing::instrument(skip(text), fields(text_len = text.len(), strip_md))]
pub fn count_text(text: &str, strip_md: bool, max_grade: Option<f64>) -> TextStats {
    let prose = if strip_md {
        markdown::to_plain_text(text)
    } else {
        text.to_string()
    };

    let words = text::count_words(&prose);
    let sentences = text::split_sentences(&prose).len();
    let paragraphs = text::split_paragraphs(&prose).len();
    let word_chars: usize = prose
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).count())
        .sum();

    let readability = score(&prose, words, sentences);
    let over_max = match (&readability, max_grade) {
        (Some(r), Some(max)) => r.grade > max,
        _ => false,
    };

    TextStats {
        words,
        characters: prose.chars().count(),
        characters_no_spaces: prose.chars().filter(|c| !c.is_whitespace()).count(),
        sentences,
        paragraphs,
        avg_word_length: ratio(word_chars, words),
        avg_sentence_length: ratio(words, sentences),
        reading_time_seconds: duration_seconds(words, READING_WPM),
        speaking_time_seconds: duration_seconds(words, SPEAKING_WPM),
        readability,
        max_grade,
        over_max,
    }
}

fn score(prose: &str, words: usize, sentences: usize) -> Option<Readability> {
    if words == 0 || sentences == 0 {
        return None;
    }

    let syllables = count_syllables(prose);
    let words_per_sentence = words as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words as f64;

    let reading_ease = 1.015f64.mul_add(-words_per_sentence, 206.835) - 84.6 * syllables_per_word;
    let grade = 0.39f64.mul_add(words_per_sentence, 11.8 * syllables_per_word) - 15.59;

    Some(Readability {
        reading_ease,
        ease_label: ease_label(reading_ease).to_string(),
        grade,
        syllables,
    })
}

/// Flesch's original interpretation bands.
fn ease_label(ease: f64) -> &'static str {
    match ease {
        e if e >= 90.0 => "very easy",
        e if e >= 80.0 => "easy",
        e if e >= 70.0 => "fairly easy",
        e if e >= 60.0 => "standard",
        e if e >= 50.0 => "fairly difficult",
        e if e >= 30.0 => "difficult",
        _ => "very difficult",
    }
}

fn count_syllables(text: &str) -> usize {
    text.split_whitespace()
        .map(|w| {
            let cleaned = w.trim_matches(|c: char| !c.is_alphabetic());
            if cleaned.is_empty() {
                0
            } else {
                syllables::count_syllables(cleaned)
            }
        })
        .sum()
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0).round() / 100.0
}

fn duration_seconds(words: usize, wpm: f64) -> u64 {
    (words as f64 / wpm * 60.0).ceil() as u64
}
