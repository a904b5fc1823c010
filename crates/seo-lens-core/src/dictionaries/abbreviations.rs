//! Abbreviations that end in a period without ending a sentence.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Lowercase abbreviations, stored without their trailing period.
pub static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();

    // Titles and honorifics
    set.extend([
        "mr", "mrs", "ms", "dr", "prof", "rev", "sr", "jr", "st", "hon", "capt", "gen", "lt",
        "sgt", "gov", "pres",
    ]);

    // Latin and reference shorthand
    set.extend([
        "etc", "vs", "e.g", "i.e", "cf", "viz", "al", "approx", "ca", "fig", "no", "vol", "pp",
        "ed", "est",
    ]);

    // Business and addresses
    set.extend([
        "inc", "ltd", "co", "corp", "llc", "dept", "ave", "blvd", "rd", "ste", "apt",
    ]);

    // Calendar
    set.extend([
        "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "mon",
        "tue", "wed", "thu", "fri", "sat", "sun",
    ]);

    set
});

/// Check whether `word` (with or without a trailing period) is a known abbreviation.
pub fn is_abbreviation(word: &str) -> bool {
    let cleaned = word.trim_end_matches('.').to_lowercase();
    ABBREVIATIONS.contains(cleaned.as_str())
}
