//! Logging setup.
//!
//! Human-readable events go to stderr, leaving stdout for command output and
//! the MCP protocol. When a log file or directory is configured, events are
//! also written there as JSON lines through a non-blocking appender.
//!
//! File destination precedence (highest first):
//! 1. `SEO_LENS_LOG_PATH` (exact file)
//! 2. `SEO_LENS_LOG_DIR` (daily rotated `seo-lens.jsonl.<date>`)
//! 3. `log_dir` from configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_PATH_ENV: &str = "SEO_LENS_LOG_PATH";
const LOG_DIR_ENV: &str = "SEO_LENS_LOG_DIR";
const LOG_FILE_PREFIX: &str = "seo-lens.jsonl";

/// Where log events should be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Exact log file; takes precedence over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory for daily rotated log files.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read `SEO_LENS_LOG_PATH` / `SEO_LENS_LOG_DIR`, falling back to the
    /// configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            non_empty_env(LOG_PATH_ENV),
            non_empty_env(LOG_DIR_ENV),
            config_log_dir,
        )
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            log_path: env_path,
            log_dir: env_dir.or(config_dir),
        }
    }

    /// Whether any file logging is configured.
    pub const fn has_file_output(&self) -> bool {
        self.log_path.is_some() || self.log_dir.is_some()
    }
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Holds the background writer; dropping it flushes pending file events.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
}

/// Build the event filter.
///
/// `RUST_LOG` wins when set. Otherwise `-q` limits output to errors, `-v`
/// raises it to debug and `-vv` to trace; with neither, the configured
/// level applies.
pub fn env_filter(quiet: bool, verbose: u8, level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(filter_directive(quiet, verbose, level))
}

fn filter_directive(quiet: bool, verbose: u8, level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, file_guard) = match file_appender(config)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(ObservabilityGuard { _file: file_guard })
}

fn file_appender(
    config: &ObservabilityConfig,
) -> anyhow::Result<Option<tracing_appender::rolling::RollingFileAppender>> {
    if let Some(ref path) = config.log_path {
        let (dir, name) = split_log_path(path)?;
        ensure_dir(&dir)?;
        return Ok(Some(tracing_appender::rolling::never(dir, name)));
    }
    if let Some(ref dir) = config.log_dir {
        ensure_dir(dir)?;
        return Ok(Some(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX)));
    }
    Ok(None)
}

fn split_log_path(path: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
    let name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir.to_path_buf(), PathBuf::from(name)))
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_path_and_dir_take_precedence() {
        let config = ObservabilityConfig::resolve(
            Some(PathBuf::from("/tmp/a.jsonl")),
            Some(PathBuf::from("/tmp/env")),
            Some(PathBuf::from("/tmp/config")),
        );
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/a.jsonl")));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/env")));
    }

    #[test]
    fn config_dir_used_when_env_unset() {
        let config = ObservabilityConfig::resolve(None, None, Some(PathBuf::from("/tmp/config")));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/config")));
        assert!(config.has_file_output());
        assert!(!ObservabilityConfig::default().has_file_output());
    }

    #[test]
    fn filter_directive_levels() {
        assert_eq!(filter_directive(true, 2, "info"), "error");
        assert_eq!(filter_directive(false, 0, "warn"), "warn");
        assert_eq!(filter_directive(false, 1, "warn"), "debug");
        assert_eq!(filter_directive(false, 3, "warn"), "trace");
    }

    #[test]
    fn split_log_path_handles_bare_file_name() {
        let (dir, name) = split_log_path(Path::new("seo-lens.jsonl")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, PathBuf::from("seo-lens.jsonl"));

        let (dir, name) = split_log_path(Path::new("/var/log/seo/run.jsonl")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log/seo"));
        assert_eq!(name, PathBuf::from("run.jsonl"));
    }

    #[test]
    fn file_appender_none_without_destination() {
        assert!(file_appender(&ObservabilityConfig::default()).unwrap().is_none());
    }
}
