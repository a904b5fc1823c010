//! Core library for seo-lens.
//!
//! On-page SEO text analysis: keyword density and n-gram frequency, word and
//! readability counts, and search result snippet previews. The `seo-lens`
//! CLI and MCP server are thin layers over this crate.
//!
//! # Modules
//!
//! - [`density`] - Keyword density, prominence, and top n-gram phrases
//! - [`counter`] - Word, sentence, and paragraph counts with Flesch scores
//! - [`serp`] - Title and meta description length checks and truncation
//! - [`text`] - Normalization, tokenization, and sentence splitting
//! - [`stopwords`] - Stop-word sets and phrase filters
//! - [`markdown`] - Markdown to visible plain text
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use seo_lens_core::{ConfigLoader, NGramSize};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let report = config
//!     .density
//!     .analyzer()
//!     .analyze("Local SEO for local shops.", Some("local seo"), NGramSize::Two);
//! println!("{} matches", report.target_count);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod counter;
pub mod density;
pub mod dictionaries;
pub mod error;
pub mod markdown;
pub mod serp;
pub mod stopwords;
pub mod text;

/// Default maximum input size in bytes (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use density::{
    AnalysisInput, DensityReport, KeywordAnalyzer, NGramSize, PhraseFrequency, Prominence,
};
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use serp::{SerpInput, SerpLimits, SerpPreview};
pub use stopwords::{PhraseFilter, StopWords};
