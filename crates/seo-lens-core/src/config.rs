//! Layered settings for seo-lens.
//!
//! Settings are merged with figment, lowest layer first:
//!
//! | Layer | Where |
//! |---|---|
//! | defaults | [`Config::default`] |
//! | user | `config.{toml,yaml,yml,json}` under [`user_config_dir`] |
//! | project | `.seo-lens.<ext>` then `seo-lens.<ext>` in the nearest ancestor that has one |
//! | explicit | files passed to [`ConfigLoader::with_file`] |
//! | environment | `SEO_LENS_*`, with `__` between nested keys |
//!
//! The ancestor walk stops at a `.git` directory unless told otherwise.
//! A directory may hold several project files; they merge in extension
//! order, so `json` beats `yml` beats `yaml` beats `toml`.
//!
//! ```no_run
//! use camino::Utf8PathBuf;
//! use seo_lens_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::try_from(std::env::current_dir().unwrap()).unwrap();
//! let (config, sources) = ConfigLoader::new().with_project_search(&cwd).load().unwrap();
//! println!("using {:?}", sources.primary_file());
//! let analyzer = config.density.analyzer();
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::density::{DensityPolicy, KeywordAnalyzer, NGramSize};
use crate::error::{ConfigError, ConfigResult};
use crate::serp::SerpLimits;
use crate::stopwords::StopWords;

/// Keyword density settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DensityConfig {
    /// Number of leading words in which a target phrase counts as prominent.
    pub prominence_window: usize,
    /// Maximum number of ranked phrases to report (at most 20).
    pub max_phrases: usize,
    /// Minimum occurrences for a phrase to be ranked (at least 2).
    pub min_count: usize,
    /// Replacement stop-word list. Omit to use the built-in English list.
    pub stop_words: Option<Vec<String>>,
    /// Words added on top of the active stop-word list.
    pub extra_stop_words: Vec<String>,
}

impl Default for DensityConfig {
    fn default() -> Self {
        let policy = DensityPolicy::default();
        Self {
            prominence_window: policy.prominence_window,
            max_phrases: policy.max_phrases,
            min_count: policy.min_count,
            stop_words: None,
            extra_stop_words: Vec::new(),
        }
    }
}

impl DensityConfig {
    /// The numeric limits as written, before clamping.
    pub const fn policy(&self) -> DensityPolicy {
        DensityPolicy {
            prominence_window: self.prominence_window,
            max_phrases: self.max_phrases,
            min_count: self.min_count,
        }
    }

    /// The configured stop-word set.
    pub fn stop_words(&self) -> StopWords {
        let base = self
            .stop_words
            .as_ref()
            .map_or_else(StopWords::english, StopWords::from_words);
        base.with_extra(&self.extra_stop_words)
    }

    /// An analyzer built from these settings.
    pub fn analyzer(&self) -> KeywordAnalyzer {
        KeywordAnalyzer::new()
            .with_policy(self.policy())
            .with_stop_words(self.stop_words())
    }
}

/// The configuration for seo-lens.
///
/// Deserialized from config files found during discovery (TOML, YAML, or
/// JSON) and `SEO_LENS_*` environment variables.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Default n-gram size for the `density` command (1, 2, or 3).
    pub ngram_size: Option<NGramSize>,
    /// Default maximum target keyword density, in percent.
    pub max_density_percent: Option<f64>,
    /// Default maximum Flesch-Kincaid grade level for the `count` command.
    pub max_grade: Option<f64>,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Omit to use the default. Use `disable_input_limit` to remove the
    /// limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    pub disable_input_limit: bool,
    /// Keyword density policy.
    pub density: DensityConfig,
    /// Snippet length ranges.
    pub serp: SerpLimits,
}

impl Config {
    /// The effective input size limit, `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(
                self.max_input_bytes
                    .unwrap_or(crate::DEFAULT_MAX_INPUT_BYTES),
            )
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// The files that fed a loaded [`Config`], grouped by layer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project files from the nearest configured ancestor, weakest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// The per-user file, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files named on the command line or added programmatically.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The file whose values win, if any file was loaded.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.layers().last()
    }

    /// Whether no file contributed at all.
    pub fn is_empty(&self) -> bool {
        self.layers().next().is_none()
    }

    /// Every file in merge order.
    fn layers(&self) -> impl Iterator<Item = &Utf8Path> {
        self.user_file
            .as_deref()
            .into_iter()
            .chain(self.project_files.iter().map(Utf8PathBuf::as_path))
            .chain(self.explicit_files.iter().map(Utf8PathBuf::as_path))
    }
}

const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

const APP_NAME: &str = "seo-lens";

const ENV_PREFIX: &str = "SEO_LENS_";

/// Finds config files and merges them into a [`Config`].
#[derive(Debug)]
pub struct ConfigLoader {
    search_from: Option<Utf8PathBuf>,
    user_layer: bool,
    stop_at: Option<String>,
    explicit: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads the user file and stops the project walk at `.git`.
    /// No project search happens until [`with_project_search`](Self::with_project_search).
    pub fn new() -> Self {
        Self {
            search_from: None,
            user_layer: true,
            stop_at: Some(".git".to_owned()),
            explicit: Vec::new(),
        }
    }

    /// Walk upward from `dir` looking for project files.
    pub fn with_project_search(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.search_from = Some(dir.as_ref().to_owned());
        self
    }

    /// Toggle the user layer.
    pub const fn with_user_config(mut self, enabled: bool) -> Self {
        self.user_layer = enabled;
        self
    }

    /// End the walk in the first ancestor above the start that contains `marker`.
    pub fn with_boundary_marker(mut self, marker: impl Into<String>) -> Self {
        self.stop_at = Some(marker.into());
        self
    }

    /// Let the walk run up to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.stop_at = None;
        self
    }

    /// Merge `path` above every discovered file. Repeated calls stack.
    pub fn with_file(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.explicit.push(path.as_ref().to_owned());
        self
    }

    /// Merge all layers into a [`Config`].
    ///
    /// A missing layer is skipped. A file that exists but does not parse, or
    /// a value of the wrong shape, is a [`ConfigError::Deserialize`].
    #[tracing::instrument(skip(self), fields(search_from = ?self.search_from))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        Self::extract(sources)
    }

    /// Like [`load`](Self::load), but [`ConfigError::NotFound`] when no
    /// file at all was found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        if sources.is_empty() {
            return Err(ConfigError::NotFound);
        }
        Self::extract(sources)
    }

    fn discover(self) -> ConfigSources {
        let user_file = if self.user_layer {
            user_config_file()
        } else {
            None
        };
        let project_files = self
            .search_from
            .as_deref()
            .map(|start| self.nearest_project_files(start))
            .unwrap_or_default();
        ConfigSources {
            project_files,
            user_file,
            explicit_files: self.explicit,
        }
    }

    fn extract(sources: ConfigSources) -> ConfigResult<(Config, ConfigSources)> {
        let figment = sources
            .layers()
            .fold(Figment::from(Serialized::defaults(Config::default())), layer)
            .merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            log_level = config.log_level.as_str(),
            primary = ?sources.primary_file(),
            "configuration merged"
        );
        Ok((config, sources))
    }

    fn nearest_project_files(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        for dir in start.ancestors() {
            let found = project_candidates(dir)
                .filter(|path| path.is_file())
                .collect::<Vec<_>>();
            if !found.is_empty() {
                return found;
            }
            // Files beside the marker still count; only the climb stops here.
            if dir != start
                && let Some(marker) = &self.stop_at
                && dir.join(marker).exists()
            {
                break;
            }
        }
        Vec::new()
    }
}

/// Project file names in `dir`, dotfiles before plain names.
fn project_candidates(dir: &Utf8Path) -> impl Iterator<Item = Utf8PathBuf> + '_ {
    [".", ""].into_iter().flat_map(move |dot| {
        CONFIG_EXTENSIONS
            .iter()
            .map(move |ext| dir.join(format!("{dot}{APP_NAME}.{ext}")))
    })
}

fn user_config_file() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Figment provider chosen by file extension; anything unknown parses as TOML.
fn layer(figment: Figment, path: &Utf8Path) -> Figment {
    let file = path.as_str();
    match path.extension() {
        Some("json") => figment.merge(Json::file_exact(file)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(file)),
        _ => figment.merge(Toml::file_exact(file)),
    }
}

/// Platform config directory for seo-lens (`$XDG_CONFIG_HOME/seo-lens` on Linux).
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_owned()).ok()
}
