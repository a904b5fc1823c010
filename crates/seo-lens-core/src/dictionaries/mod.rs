//! Small curated dictionaries used by sentence splitting and readability scoring.

pub mod abbreviations;
pub mod syllables;
