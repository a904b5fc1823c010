//! Text processing utilities.
//!
//! Two views of the same input are needed by the tools:
//!
//! - [`tokenize`] produces the normalized token stream used for keyword
//!   density: lowercase, only `[a-z0-9'-]` kept, split on whitespace.
//! - [`split_sentences`] and [`split_paragraphs`] keep the original text
//!   for counting and readability scoring.

use regex::Regex;
use std::sync::LazyLock;

use crate::dictionaries::abbreviations::is_abbreviation;

/// Everything that is not a lowercase ASCII letter, digit, whitespace,
/// apostrophe, or hyphen.
static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s'-]").expect("valid regex"));

/// Lowercase `text` and drop every character outside `[a-z0-9\s'-]`.
///
/// Non-ASCII letters are removed rather than transliterated, so "café"
/// becomes "caf".
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    DISALLOWED_CHARS.replace_all(&lowered, "").into_owned()
}

/// Normalize `text` and split it into whitespace-separated tokens.
///
/// Whitespace-only input yields an empty vector.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Count words the way a reader would: whitespace-separated runs containing
/// at least one letter or digit.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .count()
}

/// Split text into paragraphs separated by one or more blank lines.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line.trim());
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

/// Split text into sentences.
///
/// A `.`, `!` or `?` ends a sentence when the next visible character starts a
/// new one (uppercase letter, digit, opening quote) or the text ends. Periods
/// after abbreviations, single-letter initials, and inside decimals do not.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        current.push(ch);
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        // Collapse runs like "?!" or "..." into the current sentence.
        if chars
            .get(i + 1)
            .is_some_and(|next| matches!(*next, '.' | '!' | '?'))
        {
            continue;
        }
        if ends_sentence(&chars, i) {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.chars().any(char::is_alphanumeric) {
        sentences.push(trimmed.to_string());
    }
}

fn ends_sentence(chars: &[char], pos: usize) -> bool {
    let next = chars[pos + 1..].iter().copied().find(|c| !c.is_whitespace());
    let Some(next) = next else {
        return true;
    };

    if chars[pos] != '.' {
        return !next.is_lowercase();
    }

    let word = word_before(chars, pos);

    // Decimal number: "3.14"
    if next.is_ascii_digit()
        && chars.get(pos + 1).is_some_and(char::is_ascii_digit)
        && word.chars().last().is_some_and(|c| c.is_ascii_digit())
    {
        return false;
    }

    if is_abbreviation(&word) {
        return false;
    }

    // Initials: "J. K. Rowling"
    let mut letters = word.chars().filter(|c| *c != '.');
    if let (Some(first), None) = (letters.next(), letters.next())
        && first.is_uppercase()
    {
        return false;
    }

    next.is_uppercase() || next.is_ascii_digit() || matches!(next, '"' | '\'' | '(' | '“')
}

/// The word immediately before `pos`, including any interior periods.
fn word_before(chars: &[char], pos: usize) -> String {
    let start = chars[..pos]
        .iter()
        .rposition(|c| !(c.is_alphanumeric() || *c == '.'))
        .map_or(0, |i| i + 1);
    chars[start..pos].iter().collect()
}
